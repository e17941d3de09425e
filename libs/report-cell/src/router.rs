use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

// The accepted file cap is 10MB; the body limit leaves headroom for the
// multipart envelope around it.
const UPLOAD_BODY_LIMIT: usize = 12 * 1024 * 1024;

const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(60);

pub fn report_routes(state: Arc<AppConfig>) -> Router {
    let analyze_routes = Router::new()
        .route("/analyze-report", post(handlers::analyze_report))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(TimeoutLayer::new(ANALYSIS_TIMEOUT));

    let public_routes = Router::new()
        .route("/chat-with-report", post(handlers::chat_with_report))
        .route("/save-report", post(handlers::save_report));

    let protected_routes = Router::new()
        .route("/get-reports", get(handlers::get_reports))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(analyze_routes)
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
