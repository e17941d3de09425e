use tracing::debug;

use shared_ai::{GeminiClient, GenerationConfig};
use shared_config::AppConfig;

use crate::models::{ChatRequest, ReportError};

/// Follow-up Q&A over a previously generated analysis. Stateless: the
/// caller resends the full analysis and conversation history each turn,
/// and nothing is persisted.
pub struct ChatService {
    gemini: GeminiClient,
}

impl ChatService {
    pub fn new(config: &AppConfig) -> Result<Self, ReportError> {
        Ok(Self {
            gemini: GeminiClient::new(config)?,
        })
    }

    pub async fn chat(&self, request: ChatRequest) -> Result<String, ReportError> {
        let message = request
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .ok_or(ReportError::MissingField("message"))?;

        let analysis = request
            .analysis
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .ok_or(ReportError::MissingField("analysis"))?;

        let prompt = build_chat_prompt(message, analysis, &request.conversation_history);
        debug!(history_turns = request.conversation_history.len(), "Sending chat prompt");

        let response = self
            .gemini
            .generate_text(&prompt, &GenerationConfig::default())
            .await?;

        Ok(response)
    }
}

fn build_chat_prompt(
    message: &str,
    analysis: &str,
    history: &[crate::models::ChatTurn],
) -> String {
    let mut conversation_context = String::new();
    if !history.is_empty() {
        conversation_context.push_str("\n\nPrevious conversation:\n");
        for turn in history {
            let speaker = if turn.role == "user" { "Patient" } else { "Assistant" };
            conversation_context.push_str(&format!("{}: {}\n", speaker, turn.content));
        }
    }

    format!(
        "You are a helpful medical AI assistant analyzing a patient's health report. Here is the complete report analysis:

{analysis}

Your role is to:
1. Answer questions about the report in simple, easy-to-understand language
2. Provide personalized health recommendations based on the results
3. Suggest diet plans, lifestyle changes, and preventive measures
4. Explain medical terms and test results clearly
5. Be empathetic and supportive

Always base your answers on the report provided. If asked about something not in the report, politely explain that you can only discuss what's in the current report.{conversation_context}

Patient's question: {message}

Please provide a helpful, clear, and empathetic response:"
    )
}
