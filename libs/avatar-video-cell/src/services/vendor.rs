use async_trait::async_trait;

use shared_config::AppConfig;

use crate::models::{
    VideoError, VideoJob, VideoJobHandle, VideoJobStatus, VideoVendorKind, VoiceOptions,
};
use crate::services::heygen::HeyGenClient;
use crate::services::jogg::JoggClient;

/// One rendering capability, many vendors. Adapters translate between the
/// vendor's own request/response shapes and these neutral ones, so callers
/// never see vendor field names.
#[async_trait]
pub trait AvatarVideoVendor: Send + Sync {
    async fn submit(&self, script: &str, voice: &VoiceOptions) -> Result<VideoJob, VideoError>;

    async fn poll(&self, handle: &VideoJobHandle) -> Result<VideoJobStatus, VideoError>;
}

/// Build the adapter for the requested vendor, or fail with
/// `VendorNotConfigured` when its credential is absent.
pub fn vendor_for(
    kind: VideoVendorKind,
    config: &AppConfig,
) -> Result<Box<dyn AvatarVideoVendor>, VideoError> {
    match kind {
        VideoVendorKind::Heygen => Ok(Box::new(HeyGenVendor {
            client: HeyGenClient::new(config)?,
        })),
        VideoVendorKind::Jogg => Ok(Box::new(JoggVendor {
            client: JoggClient::new(config)?,
        })),
    }
}

struct HeyGenVendor {
    client: HeyGenClient,
}

#[async_trait]
impl AvatarVideoVendor for HeyGenVendor {
    async fn submit(&self, script: &str, _voice: &VoiceOptions) -> Result<VideoJob, VideoError> {
        let video_id = self.client.generate_video(script).await?;

        Ok(VideoJob {
            handle: VideoJobHandle {
                vendor: VideoVendorKind::Heygen,
                job_id: video_id,
            },
            status: "processing".to_string(),
            video_url: None,
        })
    }

    async fn poll(&self, handle: &VideoJobHandle) -> Result<VideoJobStatus, VideoError> {
        self.client.video_status(&handle.job_id).await
    }
}

struct JoggVendor {
    client: JoggClient,
}

#[async_trait]
impl AvatarVideoVendor for JoggVendor {
    async fn submit(&self, script: &str, voice: &VoiceOptions) -> Result<VideoJob, VideoError> {
        let language = voice
            .language
            .as_deref()
            .unwrap_or(JoggClient::DEFAULT_LANGUAGE);
        let asset_url = self.client.create_preview(script, language).await?;

        // The finished asset doubles as the job id.
        Ok(VideoJob {
            handle: VideoJobHandle {
                vendor: VideoVendorKind::Jogg,
                job_id: asset_url.clone(),
            },
            status: "completed".to_string(),
            video_url: Some(asset_url),
        })
    }

    async fn poll(&self, handle: &VideoJobHandle) -> Result<VideoJobStatus, VideoError> {
        // Rendering finished at submission; echo the asset without a
        // network round-trip.
        Ok(VideoJobStatus {
            status: "completed".to_string(),
            video_url: Some(handle.job_id.clone()),
            thumbnail_url: None,
        })
    }
}
