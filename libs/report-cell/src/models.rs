// libs/report-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use shared_ai::AiError;

// ==============================================================================
// CORE REPORT MODELS
// ==============================================================================

/// A persisted report row in the `health_reports` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub id: String,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub analysis: String,
    pub family_member_name: String,
    pub relationship: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new report row. The store assigns id and
/// creation timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct NewHealthReport {
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub analysis: String,
    pub family_member_name: String,
    pub relationship: String,
}

/// Whose report this is, relative to the uploading account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    #[serde(rename = "Self")]
    Myself,
    Father,
    Mother,
    Spouse,
    Son,
    Daughter,
    Brother,
    Sister,
    Other,
}

impl Relationship {
    /// Uploads arrive with free-text labels; anything unrecognized is
    /// filed under `Other` rather than rejected.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Self" => Relationship::Myself,
            "Father" => Relationship::Father,
            "Mother" => Relationship::Mother,
            "Spouse" => Relationship::Spouse,
            "Son" => Relationship::Son,
            "Daughter" => Relationship::Daughter,
            "Brother" => Relationship::Brother,
            "Sister" => Relationship::Sister,
            _ => Relationship::Other,
        }
    }
}

impl Default for Relationship {
    fn default() -> Self {
        Relationship::Myself
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relationship::Myself => write!(f, "Self"),
            Relationship::Father => write!(f, "Father"),
            Relationship::Mother => write!(f, "Mother"),
            Relationship::Spouse => write!(f, "Spouse"),
            Relationship::Son => write!(f, "Son"),
            Relationship::Daughter => write!(f, "Daughter"),
            Relationship::Brother => write!(f, "Brother"),
            Relationship::Sister => write!(f, "Sister"),
            Relationship::Other => write!(f, "Other"),
        }
    }
}

/// An uploaded file pulled out of the multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeReportResponse {
    pub analysis: String,
    pub file_name: String,
    pub file_size: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    pub analysis: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReportRequest {
    pub user_email: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub analysis: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No file provided")]
    MissingFile,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("File exceeds the {max_mb}MB upload limit")]
    FileTooLarge { max_mb: usize },

    #[error("Unsupported file type")]
    UnsupportedFileType,

    #[error("Document rejected by the medical classification gate")]
    NotAMedicalDocument,

    #[error("AI service not configured")]
    NotConfigured,

    #[error("Analysis failed: {message}")]
    AnalysisFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AiError> for ReportError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::NotConfigured => ReportError::NotConfigured,
            AiError::Api { status, body } => ReportError::AnalysisFailed {
                status: Some(status),
                message: body,
            },
            AiError::Request(e) => ReportError::AnalysisFailed {
                status: None,
                message: e.to_string(),
            },
            AiError::MalformedResponse(message) => ReportError::AnalysisFailed {
                status: None,
                message,
            },
        }
    }
}
