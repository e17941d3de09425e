use chrono::Utc;
use tracing::{debug, error, info};

use shared_ai::{GeminiClient, GenerationConfig};
use shared_config::AppConfig;
use shared_models::auth::User;

use crate::models::{
    AnalyzeReportResponse, NewHealthReport, Relationship, ReportError, UploadedFile,
};
use crate::services::store::ReportStore;

pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

const FALLBACK_ANALYSIS: &str = "No analysis generated";

const CLASSIFICATION_PROMPT: &str = "You are a document classifier for a health application. \
Decide whether the attached document contains medical or health-related content, such as a lab \
report, prescription, scan result, discharge summary, or doctor's note. Be lenient: when in \
doubt, treat the document as medical. Reply with exactly one word: VALID if the document is \
medical or health-related, INVALID if it is not.";

const ANALYSIS_PROMPT: &str = "You are a medical expert AI assistant. Analyze this lab report and provide a detailed, patient-friendly explanation.

Structure your response in the following format:

## Report Summary
[Brief overview of what tests were conducted]

## Key Findings
[List the main test results with normal ranges]

## What This Means
[Explain in simple terms what these results indicate about the patient's health]

## Recommendations
[Suggest next steps or lifestyle changes if applicable]

## Important Notes
[Any critical values or concerns that need immediate attention]

Make it conversational, empathetic, and easy to understand for someone without medical background.";

const CLASSIFICATION_GENERATION: GenerationConfig = GenerationConfig {
    temperature: 0.1,
    max_output_tokens: 10,
};

const ANALYSIS_GENERATION: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    max_output_tokens: 2000,
};

/// Identify the upload by its magic bytes. Only the formats the analysis
/// provider accepts are allowed through.
pub fn detect_content_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"%PDF") {
        return Some("application/pdf");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Some("image/png");
    }
    None
}

/// The report analysis pipeline: validate, classify, analyze, persist.
///
/// Persistence is best-effort. The primary contract of `analyze` is the
/// explanation text; a failed write is logged and the caller still gets
/// a success response.
pub struct AnalysisService {
    gemini: GeminiClient,
    store: ReportStore,
    skip_document_check: bool,
}

impl AnalysisService {
    pub fn new(config: &AppConfig) -> Result<Self, ReportError> {
        let gemini = GeminiClient::new(config)?;

        Ok(Self {
            gemini,
            store: ReportStore::new(config),
            skip_document_check: config.skip_document_check,
        })
    }

    pub async fn analyze(
        &self,
        file: UploadedFile,
        family_member_name: Option<String>,
        relationship: Option<String>,
        user: Option<&User>,
    ) -> Result<AnalyzeReportResponse, ReportError> {
        if file.bytes.len() > MAX_FILE_SIZE {
            return Err(ReportError::FileTooLarge {
                max_mb: MAX_FILE_SIZE / (1024 * 1024),
            });
        }

        let content_type =
            detect_content_type(&file.bytes).ok_or(ReportError::UnsupportedFileType)?;

        if self.skip_document_check {
            debug!("Document classification disabled, proceeding to analysis");
        } else {
            self.classify(&file, content_type).await?;
        }

        let generated = self
            .gemini
            .generate_with_file(ANALYSIS_PROMPT, content_type, &file.bytes, &ANALYSIS_GENERATION)
            .await?;

        let analysis = if generated.trim().is_empty() {
            FALLBACK_ANALYSIS.to_string()
        } else {
            generated
        };

        let record = NewHealthReport {
            user_id: user.map(|u| u.id.clone()),
            user_email: user.and_then(|u| u.email.clone()),
            file_name: file.name.clone(),
            file_size: file.bytes.len() as i64,
            file_type: content_type.to_string(),
            analysis: analysis.clone(),
            family_member_name: family_member_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Self".to_string()),
            relationship: relationship
                .map(|label| Relationship::from_label(&label))
                .unwrap_or_default()
                .to_string(),
        };

        match self.store.insert_report(&record).await {
            Ok(report_id) => {
                info!(report_id = %report_id, file_name = %file.name, "Report analysis persisted");
            }
            Err(e) => {
                error!(file_name = %file.name, error = %e, "Failed to persist report analysis");
            }
        }

        Ok(AnalyzeReportResponse {
            analysis,
            file_name: file.name,
            file_size: file.bytes.len() as u64,
            timestamp: Utc::now(),
        })
    }

    /// The classification gate. Rejecting here stops the pipeline before
    /// the expensive analysis call.
    async fn classify(&self, file: &UploadedFile, content_type: &str) -> Result<(), ReportError> {
        let verdict = self
            .gemini
            .generate_with_file(
                CLASSIFICATION_PROMPT,
                content_type,
                &file.bytes,
                &CLASSIFICATION_GENERATION,
            )
            .await?;

        let normalized = verdict.trim().to_uppercase();

        // "INVALID" contains "VALID", so the rejection check runs first.
        if normalized.contains("INVALID") || !normalized.contains("VALID") {
            info!(verdict = %verdict.trim(), "Document rejected by classification gate");
            return Err(ReportError::NotAMedicalDocument);
        }

        Ok(())
    }
}
