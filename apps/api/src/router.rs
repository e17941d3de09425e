use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use admin_cell::router::admin_routes;
use avatar_video_cell::router::avatar_video_routes;
use booking_cell::router::booking_routes;
use report_cell::router::report_routes;
use shared_config::AppConfig;
use subscription_cell::router::subscription_routes;

/// The public surface is flat: every cell registers its own full paths,
/// so cells are merged rather than nested under prefixes.
pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Tabeer AI API is running!" }))
        .merge(report_routes(state.clone()))
        .merge(avatar_video_routes(state.clone()))
        .merge(booking_routes(state.clone()))
        .merge(subscription_routes(state.clone()))
        .merge(admin_routes(state))
}
