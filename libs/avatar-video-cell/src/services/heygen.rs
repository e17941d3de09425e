// libs/avatar-video-cell/src/services/heygen.rs
use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{
    HeyGenCharacter, HeyGenDimension, HeyGenGenerateRequest, HeyGenGenerateResponse,
    HeyGenStatusResponse, HeyGenVideoInput, HeyGenVoice, VideoError, VideoJobStatus,
};

const HEYGEN_AVATAR_ID: &str = "Nadim";
const HEYGEN_AVATAR_STYLE: &str = "normal";
const HEYGEN_VOICE_ID: &str = "119caed25533477ba63822d5d1552d25";
const HEYGEN_VOICE_SPEED: f32 = 1.1;
const HEYGEN_VIDEO_WIDTH: u32 = 1280;
const HEYGEN_VIDEO_HEIGHT: u32 = 720;

/// HeyGen avatar rendering client. Rendering is asynchronous: generation
/// returns a video id which must be polled until the asset is ready.
pub struct HeyGenClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl HeyGenClient {
    pub fn new(config: &AppConfig) -> Result<Self, VideoError> {
        if !config.is_heygen_configured() {
            return Err(VideoError::VendorNotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            api_key: config.heygen_api_key.clone(),
            base_url: config.heygen_base_url.clone(),
        })
    }

    /// Submit a script for rendering.
    /// POST /v2/video/generate
    pub async fn generate_video(&self, script: &str) -> Result<String, VideoError> {
        info!("Submitting script to HeyGen ({} chars)", script.len());

        let url = format!("{}/v2/video/generate", self.base_url);

        let request_body = HeyGenGenerateRequest {
            video_inputs: vec![HeyGenVideoInput {
                character: HeyGenCharacter {
                    character_type: "avatar".to_string(),
                    avatar_id: HEYGEN_AVATAR_ID.to_string(),
                    avatar_style: HEYGEN_AVATAR_STYLE.to_string(),
                },
                voice: HeyGenVoice {
                    voice_type: "text".to_string(),
                    input_text: script.to_string(),
                    voice_id: HEYGEN_VOICE_ID.to_string(),
                    speed: HEYGEN_VOICE_SPEED,
                },
            }],
            dimension: HeyGenDimension {
                width: HEYGEN_VIDEO_WIDTH,
                height: HEYGEN_VIDEO_HEIGHT,
            },
        };

        debug!("Sending video generation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        debug!("HeyGen generation response: {} - {}", status, response_text);

        if !status.is_success() {
            error!("HeyGen video generation failed: {} - {}", status, response_text);
            return Err(VideoError::VendorFailed {
                status: Some(status.as_u16()),
                message: response_text,
            });
        }

        let generate_response: HeyGenGenerateResponse = serde_json::from_str(&response_text)
            .map_err(|e| VideoError::VendorFailed {
                status: None,
                message: format!("Failed to parse HeyGen response: {}", e),
            })?;

        let video_id = generate_response
            .data
            .and_then(|data| data.video_id)
            .or(generate_response.video_id)
            .ok_or(VideoError::MalformedVendorResponse("video_id"))?;

        info!("HeyGen accepted video job: {}", video_id);
        Ok(video_id)
    }

    /// Check a rendering job.
    /// GET /v1/video_status.get?video_id={id}
    pub async fn video_status(&self, video_id: &str) -> Result<VideoJobStatus, VideoError> {
        debug!("Checking HeyGen video status: {}", video_id);

        let url = format!(
            "{}/v1/video_status.get?video_id={}",
            self.base_url, video_id
        );

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("HeyGen status check failed: {} - {}", status, response_text);
            return Err(VideoError::VendorFailed {
                status: Some(status.as_u16()),
                message: response_text,
            });
        }

        let status_response: HeyGenStatusResponse = serde_json::from_str(&response_text)
            .map_err(|e| VideoError::VendorFailed {
                status: None,
                message: format!("Failed to parse HeyGen status response: {}", e),
            })?;

        let data = status_response
            .data
            .ok_or(VideoError::MalformedVendorResponse("status"))?;

        let job_status = data.status.unwrap_or_else(|| "unknown".to_string());
        info!("HeyGen video {} status: {}", video_id, job_status);

        Ok(VideoJobStatus {
            status: job_status,
            video_url: data.video_url,
            thumbnail_url: data.thumbnail_url,
        })
    }
}
