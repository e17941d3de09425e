// libs/avatar-video-cell/src/services/jogg.rs
use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{JoggPreviewRequest, JoggPreviewResponse, VideoError};

const JOGG_ASPECT_RATIO: u32 = 0;
const JOGG_VIDEO_LENGTH: &str = "15";
const JOGG_AVATAR_ID: u32 = 1422;
const JOGG_AVATAR_TYPE: u32 = 0;
const JOGG_SCRIPT_STYLE: &str = "Problem/Solution";
const JOGG_TEMPLATE_TYPE: &str = "public";
const JOGG_VOICE_ID: &str = "tb_f933422a22374ec6b7e55028acd69a64";
const JOGG_VISUAL_STYLE: u32 = 188;

/// Jogg avatar rendering client. Rendering is synchronous: the preview
/// endpoint returns a finished asset URL in the same call.
pub struct JoggClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl JoggClient {
    pub const DEFAULT_LANGUAGE: &'static str = "english";

    pub fn new(config: &AppConfig) -> Result<Self, VideoError> {
        if !config.is_jogg_configured() {
            return Err(VideoError::VendorNotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            api_key: config.jogg_api_key.clone(),
            base_url: config.jogg_base_url.clone(),
        })
    }

    /// Render a script into a preview video.
    /// POST /v1/preview
    pub async fn create_preview(
        &self,
        script: &str,
        language: &str,
    ) -> Result<String, VideoError> {
        info!("Submitting script to Jogg ({} chars, {})", script.len(), language);

        let url = format!("{}/v1/preview", self.base_url);

        let request_body = JoggPreviewRequest {
            language: language.to_string(),
            aspect_ratio: JOGG_ASPECT_RATIO,
            video_length: JOGG_VIDEO_LENGTH.to_string(),
            avatar_id: JOGG_AVATAR_ID,
            avatar_type: JOGG_AVATAR_TYPE,
            script: script.to_string(),
            script_style: JOGG_SCRIPT_STYLE.to_string(),
            template_type: JOGG_TEMPLATE_TYPE.to_string(),
            voice_id: JOGG_VOICE_ID.to_string(),
            caption: true,
            visual_style: JOGG_VISUAL_STYLE,
        };

        debug!("Sending preview request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        debug!("Jogg preview response: {} - {}", status, response_text);

        if !status.is_success() {
            error!("Jogg preview generation failed: {} - {}", status, response_text);
            return Err(VideoError::VendorFailed {
                status: Some(status.as_u16()),
                message: response_text,
            });
        }

        let preview_response: JoggPreviewResponse = serde_json::from_str(&response_text)
            .map_err(|e| VideoError::VendorFailed {
                status: None,
                message: format!("Failed to parse Jogg response: {}", e),
            })?;

        let asset_url = preview_response
            .asset_url()
            .ok_or(VideoError::MalformedVendorResponse("preview_url"))?;

        info!("Jogg returned preview asset: {}", asset_url);
        Ok(asset_url)
    }
}
