use std::sync::Arc;
use std::time::Duration;
use axum::{routing::post, Router};
use tower_http::timeout::TimeoutLayer;

use shared_config::AppConfig;

use crate::handlers::{generate_video_script, poll_video_job, submit_video_job};

/// Script generation runs a full LLM call; give it the same budget as
/// report analysis.
const SCRIPT_TIMEOUT: Duration = Duration::from_secs(60);

pub fn avatar_video_routes(state: Arc<AppConfig>) -> Router {
    let script_routes = Router::new()
        .route("/generate-video-script", post(generate_video_script))
        .layer(TimeoutLayer::new(SCRIPT_TIMEOUT));

    let job_routes = Router::new()
        .route("/video/jobs", post(submit_video_job))
        .route("/video/jobs/status", post(poll_video_job));

    script_routes.merge(job_routes).with_state(state)
}
