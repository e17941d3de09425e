pub mod gemini;

pub use gemini::{AiError, GeminiClient, GenerationConfig};
