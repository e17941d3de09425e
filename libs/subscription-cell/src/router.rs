use std::sync::Arc;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{submit_subscription, subscription_status};

pub fn subscription_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/subscriptions/submit", post(submit_subscription))
        .route("/subscriptions/status", get(subscription_status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
