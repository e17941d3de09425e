use tracing::debug;

use shared_ai::{GeminiClient, GenerationConfig};
use shared_config::AppConfig;

use crate::models::{ScriptStyle, VideoError};

const NARRATED_GENERATION: GenerationConfig = GenerationConfig {
    temperature: 0.8,
    max_output_tokens: 2000,
};

/// Turns a report analysis into a spoken-style video script.
pub struct ScriptService {
    gemini: GeminiClient,
}

impl ScriptService {
    pub fn new(config: &AppConfig) -> Result<Self, VideoError> {
        Ok(Self {
            gemini: GeminiClient::new(config)?,
        })
    }

    pub async fn generate(
        &self,
        analysis: &str,
        language: &str,
        style: ScriptStyle,
    ) -> Result<String, VideoError> {
        debug!(%language, ?style, "Generating video script");

        let script = match style {
            ScriptStyle::Narrated => {
                let prompt = narrated_prompt(analysis, language);
                self.gemini
                    .generate_text(&prompt, &NARRATED_GENERATION)
                    .await?
            }
            ScriptStyle::Compact => {
                let prompt = compact_prompt(analysis);
                self.gemini
                    .generate_text(&prompt, &GenerationConfig::default())
                    .await?
            }
        };

        Ok(script)
    }
}

fn narrated_prompt(analysis: &str, language: &str) -> String {
    format!(
        "Convert this medical report analysis into a friendly, conversational video script in {language}.

The script should:
- Be spoken in a warm, reassuring tone
- Use simple language that anyone can understand
- Be structured in short, clear segments (30-45 seconds each)
- Include natural pauses and transitions
- Be culturally appropriate for {language} speakers
- Total duration: 2-3 minutes

Analysis to convert:
{analysis}

Format the script with timestamps like:
[00:00-00:30] Introduction segment
[00:30-01:00] Key findings segment
etc."
    )
}

fn compact_prompt(analysis: &str) -> String {
    format!(
        "Based on this health report analysis, create a VERY SHORT video script (maximum 150 words) that includes:
1. Patient name or \"the patient\"
2. Main health problem/concern (1-2 sentences)
3. Key solution/recommendation (1-2 sentences)

Keep it conversational, friendly, and under 150 words total.

Analysis:
{analysis}

Format: Just the script text, no labels or formatting."
    )
}
