// libs/avatar-video-cell/src/handlers.rs
use std::sync::Arc;
use axum::{extract::State, Json};
use chrono::Utc;
use tracing::info;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    GenerateScriptRequest, GenerateScriptResponse, PollVideoJobRequest, SubmitVideoJobRequest,
    VideoError, VideoJob, VideoJobStatus,
};
use crate::services::script::ScriptService;
use crate::services::vendor::vendor_for;

const DEFAULT_SCRIPT_LANGUAGE: &str = "English";

fn map_script_error(err: VideoError) -> AppError {
    match err {
        VideoError::MissingField(_) => AppError::BadRequest("No analysis provided".to_string()),
        VideoError::AiNotConfigured => AppError::ServiceUnavailable(
            "AI service not configured. Set GOOGLE_GENERATIVE_AI_API_KEY to enable script generation"
                .to_string(),
        ),
        VideoError::ScriptFailed { status, message } => AppError::UpstreamProvider {
            status,
            message: "Failed to generate video script".to_string(),
            details: Some(message),
        },
        other => AppError::Internal(other.to_string()),
    }
}

fn map_vendor_error(action: &str, err: VideoError) -> AppError {
    match err {
        VideoError::VendorNotConfigured => AppError::ServiceUnavailable(
            "Avatar video vendor not configured. Set HEYGEN_API_KEY or JOGG_API_KEY to enable video generation"
                .to_string(),
        ),
        VideoError::VendorFailed { status, message } => AppError::UpstreamProvider {
            status,
            message: action.to_string(),
            details: Some(message),
        },
        VideoError::Request(e) => AppError::UpstreamProvider {
            status: None,
            message: action.to_string(),
            details: Some(e.to_string()),
        },
        VideoError::MalformedVendorResponse(field) => AppError::UpstreamProvider {
            status: None,
            message: format!("Vendor response missing {}", field),
            details: None,
        },
        other => AppError::Internal(other.to_string()),
    }
}

/// POST /generate-video-script
pub async fn generate_video_script(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<GenerateScriptRequest>,
) -> Result<Json<GenerateScriptResponse>, AppError> {
    let analysis = request
        .analysis
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("No analysis provided".to_string()))?;

    let language = request
        .language
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SCRIPT_LANGUAGE.to_string());

    let service = ScriptService::new(&config).map_err(map_script_error)?;
    let script = service
        .generate(analysis, &language, request.style)
        .await
        .map_err(map_script_error)?;

    Ok(Json(GenerateScriptResponse {
        script,
        language,
        estimated_duration: request.style.estimated_duration().to_string(),
        timestamp: Utc::now(),
    }))
}

/// POST /video/jobs
pub async fn submit_video_job(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<SubmitVideoJobRequest>,
) -> Result<Json<VideoJob>, AppError> {
    let script = request
        .script
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Script is required".to_string()))?;

    let vendor = vendor_for(request.vendor, &config)
        .map_err(|e| map_vendor_error("Failed to generate video", e))?;

    let job = vendor
        .submit(script, &request.voice)
        .await
        .map_err(|e| map_vendor_error("Failed to generate video", e))?;

    info!(
        vendor = %request.vendor,
        job_id = %job.handle.job_id,
        status = %job.status,
        "Video job submitted"
    );

    Ok(Json(job))
}

/// POST /video/jobs/status
pub async fn poll_video_job(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<PollVideoJobRequest>,
) -> Result<Json<VideoJobStatus>, AppError> {
    let handle = request
        .handle
        .ok_or_else(|| AppError::BadRequest("No job handle provided".to_string()))?;

    let vendor = vendor_for(handle.vendor, &config)
        .map_err(|e| map_vendor_error("Failed to check video status", e))?;

    let status = vendor
        .poll(&handle)
        .await
        .map_err(|e| map_vendor_error("Failed to check video status", e))?;

    Ok(Json(status))
}
