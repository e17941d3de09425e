use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::maybe_user;

use crate::models::{
    AnalyzeReportResponse, ChatRequest, ChatResponse, NewHealthReport, ReportError,
    SaveReportRequest, UploadedFile,
};
use crate::services::{analysis::AnalysisService, chat::ChatService, store::ReportStore};

fn map_pipeline_error(e: ReportError) -> AppError {
    match e {
        ReportError::MissingFile => AppError::BadRequest("No file provided".to_string()),
        ReportError::MissingField(field) => {
            AppError::BadRequest(format!("{} is required", field))
        }
        ReportError::FileTooLarge { max_mb } => {
            AppError::PayloadTooLarge(format!("File exceeds the {}MB upload limit", max_mb))
        }
        ReportError::UnsupportedFileType => AppError::UnsupportedMedia(
            "Unsupported file type. Please upload a PDF, JPG, or PNG file".to_string(),
        ),
        ReportError::NotAMedicalDocument => AppError::BadRequest(
            "This does not appear to be a medical document. Please upload a lab report, \
             prescription, scan report, or other health record"
                .to_string(),
        ),
        ReportError::NotConfigured => AppError::ServiceUnavailable(
            "AI service not configured. Set GOOGLE_GENERATIVE_AI_API_KEY to enable report \
             analysis"
                .to_string(),
        ),
        ReportError::AnalysisFailed { status, message } => AppError::UpstreamProvider {
            status,
            message: "Failed to analyze report".to_string(),
            details: Some(message),
        },
        ReportError::DatabaseError(message) => AppError::Database(message),
    }
}

/// POST /analyze-report
///
/// Multipart upload: `file` (required), `familyMemberName` and
/// `relationship` (optional). Identity is optional too; anonymous
/// uploads produce unowned report rows.
pub async fn analyze_report(
    State(state): State<Arc<AppConfig>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeReportResponse>, AppError> {
    let user = maybe_user(&headers, &state);

    let mut file: Option<UploadedFile> = None;
    let mut family_member_name: Option<String> = None;
    let mut relationship: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Uploaded file is too large".to_string())
        } else {
            AppError::BadRequest(format!("Invalid multipart request: {}", e.body_text()))
        }
    })? {
        match field.name() {
            Some("file") => {
                let name = field
                    .file_name()
                    .unwrap_or("report")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                        AppError::PayloadTooLarge("Uploaded file is too large".to_string())
                    } else {
                        AppError::BadRequest("Failed to read uploaded file".to_string())
                    }
                })?;
                file = Some(UploadedFile {
                    name,
                    bytes: bytes.to_vec(),
                });
            }
            Some("familyMemberName") => {
                family_member_name = field.text().await.ok();
            }
            Some("relationship") => {
                relationship = field.text().await.ok();
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| map_pipeline_error(ReportError::MissingFile))?;
    debug!(file_name = %file.name, file_size = file.bytes.len(), "Received report upload");

    let service = AnalysisService::new(&state).map_err(map_pipeline_error)?;

    let response = service
        .analyze(file, family_member_name, relationship, user.as_ref())
        .await
        .map_err(map_pipeline_error)?;

    Ok(Json(response))
}

/// POST /chat-with-report
pub async fn chat_with_report(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let service = ChatService::new(&state).map_err(|e| match e {
        ReportError::NotConfigured => {
            AppError::ServiceUnavailable("AI service not configured".to_string())
        }
        other => map_pipeline_error(other),
    })?;

    let response = service.chat(request).await.map_err(|e| match e {
        ReportError::MissingField(_) => {
            AppError::BadRequest("Message and analysis are required".to_string())
        }
        ReportError::AnalysisFailed { status, message } => AppError::UpstreamProvider {
            status,
            message: "Failed to process chat message".to_string(),
            details: Some(message),
        },
        other => map_pipeline_error(other),
    })?;

    Ok(Json(ChatResponse { response }))
}

/// POST /save-report
///
/// Direct persistence endpoint for an already generated analysis.
pub async fn save_report(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<SaveReportRequest>,
) -> Result<Json<Value>, AppError> {
    let file_name = request
        .file_name
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required fields".to_string()))?;
    let file_size = request
        .file_size
        .filter(|v| *v > 0)
        .ok_or_else(|| AppError::BadRequest("Missing required fields".to_string()))?;
    let file_type = request
        .file_type
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required fields".to_string()))?;
    let analysis = request
        .analysis
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required fields".to_string()))?;

    let record = NewHealthReport {
        user_id: None,
        user_email: request.user_email,
        file_name,
        file_size,
        file_type,
        analysis,
        family_member_name: "Self".to_string(),
        relationship: "Self".to_string(),
    };

    let store = ReportStore::new(&state);
    let report_id = store
        .insert_report(&record)
        .await
        .map_err(|_| AppError::Database("Failed to save report".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "reportId": report_id,
    })))
}

/// GET /get-reports
pub async fn get_reports(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let store = ReportStore::new(&state);

    let reports = store
        .reports_for_user(&user.id)
        .await
        .map_err(|_| AppError::Database("Failed to fetch reports".to_string()))?;

    Ok(Json(json!({ "reports": reports })))
}
