// libs/avatar-video-cell/src/lib.rs
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    GenerateScriptRequest, GenerateScriptResponse, ScriptStyle, VideoError, VideoJob,
    VideoJobHandle, VideoJobStatus, VideoVendorKind, VoiceOptions,
};
pub use router::avatar_video_routes;

// Re-export for external use
pub mod api {
    pub use crate::services::heygen::HeyGenClient;
    pub use crate::services::jogg::JoggClient;
    pub use crate::services::script::ScriptService;
    pub use crate::services::vendor::{vendor_for, AvatarVideoVendor};
}
