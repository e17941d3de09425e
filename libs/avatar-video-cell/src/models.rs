// libs/avatar-video-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use shared_ai::AiError;

// ==============================================================================
// SCRIPT GENERATION MODELS
// ==============================================================================

/// How the generated script should read.
///
/// `Narrated` produces a timestamped multi-segment script meant to be read
/// over the full analysis. `Compact` produces a short spoken blurb suitable
/// for avatar rendering, where vendors cap the clip length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptStyle {
    Narrated,
    Compact,
}

impl Default for ScriptStyle {
    fn default() -> Self {
        ScriptStyle::Narrated
    }
}

impl ScriptStyle {
    pub fn estimated_duration(&self) -> &'static str {
        match self {
            ScriptStyle::Narrated => "2-3 minutes",
            ScriptStyle::Compact => "under 1 minute",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateScriptRequest {
    pub analysis: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub style: ScriptStyle,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScriptResponse {
    pub script: String,
    pub language: String,
    pub estimated_duration: String,
    pub timestamp: DateTime<Utc>,
}

// ==============================================================================
// VIDEO JOB MODELS
// ==============================================================================

/// Which rendering vendor a job belongs to. Callers pick one at submission
/// and get it back inside the handle so polling can route to the right
/// adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoVendorKind {
    Heygen,
    Jogg,
}

impl Default for VideoVendorKind {
    fn default() -> Self {
        VideoVendorKind::Heygen
    }
}

impl VideoVendorKind {
    /// Environment variable holding the vendor credential, for remediation
    /// messages.
    pub fn credential_env(&self) -> &'static str {
        match self {
            VideoVendorKind::Heygen => "HEYGEN_API_KEY",
            VideoVendorKind::Jogg => "JOGG_API_KEY",
        }
    }
}

impl fmt::Display for VideoVendorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoVendorKind::Heygen => write!(f, "HeyGen"),
            VideoVendorKind::Jogg => write!(f, "Jogg"),
        }
    }
}

/// Voice knobs a caller may set at submission. Vendors that fix their own
/// voice profile ignore these.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceOptions {
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitVideoJobRequest {
    pub script: Option<String>,
    #[serde(default)]
    pub vendor: VideoVendorKind,
    #[serde(default)]
    pub voice: VoiceOptions,
}

/// Opaque reference to a submitted rendering job. For asynchronous vendors
/// `job_id` is the vendor-assigned id to poll with; for synchronous vendors
/// it is the finished asset URL itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoJobHandle {
    pub vendor: VideoVendorKind,
    pub job_id: String,
}

/// Submission outcome returned to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoJob {
    pub handle: VideoJobHandle,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollVideoJobRequest {
    pub handle: Option<VideoJobHandle>,
}

/// Poll outcome. `status` is the vendor's own lifecycle word passed
/// through unchanged.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoJobStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

// ==============================================================================
// HEYGEN WIRE TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HeyGenGenerateRequest {
    pub video_inputs: Vec<HeyGenVideoInput>,
    pub dimension: HeyGenDimension,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeyGenVideoInput {
    pub character: HeyGenCharacter,
    pub voice: HeyGenVoice,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeyGenCharacter {
    #[serde(rename = "type")]
    pub character_type: String,
    pub avatar_id: String,
    pub avatar_style: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeyGenVoice {
    #[serde(rename = "type")]
    pub voice_type: String,
    pub input_text: String,
    pub voice_id: String,
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeyGenDimension {
    pub width: u32,
    pub height: u32,
}

/// Some HeyGen deployments nest the id under `data`, some return it at the
/// top level. Both spellings are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct HeyGenGenerateResponse {
    pub data: Option<HeyGenVideoData>,
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeyGenVideoData {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeyGenStatusResponse {
    pub data: Option<HeyGenStatusData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeyGenStatusData {
    pub status: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

// ==============================================================================
// JOGG WIRE TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct JoggPreviewRequest {
    pub language: String,
    pub aspect_ratio: u32,
    pub video_length: String,
    pub avatar_id: u32,
    pub avatar_type: u32,
    pub script: String,
    pub script_style: String,
    pub template_type: String,
    pub voice_id: String,
    pub caption: bool,
    pub visual_style: u32,
}

/// Jogg has been observed returning the asset under any of these keys.
#[derive(Debug, Clone, Deserialize)]
pub struct JoggPreviewResponse {
    pub preview_url: Option<String>,
    pub video_url: Option<String>,
    pub url: Option<String>,
}

impl JoggPreviewResponse {
    pub fn asset_url(self) -> Option<String> {
        self.preview_url.or(self.video_url).or(self.url)
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("AI service not configured")]
    AiNotConfigured,

    #[error("Avatar video vendor not configured")]
    VendorNotConfigured,

    #[error("Script generation failed: {message}")]
    ScriptFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Vendor request failed: {message}")]
    VendorFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Vendor response missing {0}")]
    MalformedVendorResponse(&'static str),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl From<AiError> for VideoError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::NotConfigured => VideoError::AiNotConfigured,
            AiError::Api { status, body } => VideoError::ScriptFailed {
                status: Some(status),
                message: body,
            },
            AiError::Request(e) => VideoError::ScriptFailed {
                status: None,
                message: e.to_string(),
            },
            AiError::MalformedResponse(message) => VideoError::ScriptFailed {
                status: None,
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn script_style_defaults_to_narrated() {
        let request: GenerateScriptRequest =
            serde_json::from_str(r###"{"analysis":"## Summary"}"###).unwrap();
        assert_eq!(request.style, ScriptStyle::Narrated);
    }

    #[test]
    fn submit_request_defaults_vendor_and_voice() {
        let request: SubmitVideoJobRequest =
            serde_json::from_str(r#"{"script":"Hello"}"#).unwrap();
        assert_eq!(request.vendor, VideoVendorKind::Heygen);
        assert!(request.voice.language.is_none());
    }

    #[test]
    fn vendor_kind_round_trips_lowercase() {
        assert_eq!(
            serde_json::to_string(&VideoVendorKind::Jogg).unwrap(),
            "\"jogg\""
        );
        let parsed: VideoVendorKind = serde_json::from_str("\"heygen\"").unwrap();
        assert_eq!(parsed, VideoVendorKind::Heygen);
    }

    #[test]
    fn job_serializes_camel_case_and_skips_missing_url() {
        let job = VideoJob {
            handle: VideoJobHandle {
                vendor: VideoVendorKind::Heygen,
                job_id: "abc123".to_string(),
            },
            status: "processing".to_string(),
            video_url: None,
        };

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["handle"]["jobId"], "abc123");
        assert_eq!(value["handle"]["vendor"], "heygen");
        assert!(value.get("videoUrl").is_none());
    }

    #[test]
    fn jogg_asset_url_prefers_preview() {
        let response: JoggPreviewResponse = serde_json::from_value(json!({
            "preview_url": "https://cdn.example.com/preview.mp4",
            "video_url": "https://cdn.example.com/video.mp4"
        }))
        .unwrap();
        assert_eq!(
            response.asset_url().as_deref(),
            Some("https://cdn.example.com/preview.mp4")
        );

        let fallback: JoggPreviewResponse =
            serde_json::from_value(json!({ "url": "https://cdn.example.com/x.mp4" })).unwrap();
        assert_eq!(
            fallback.asset_url().as_deref(),
            Some("https://cdn.example.com/x.mp4")
        );
    }
}
