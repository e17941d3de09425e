use std::sync::Arc;
use axum::{
    middleware,
    routing::get,
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::admin_middleware;

use crate::handlers::{
    admin_bookings, admin_reports, admin_stats, admin_subscriptions, admin_users,
    review_subscription,
};

/// Every admin surface sits behind the same guard: the bearer token must
/// validate and its email must match the configured admin address.
pub fn admin_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/admin/stats", get(admin_stats))
        .route("/admin/users", get(admin_users))
        .route("/admin/reports", get(admin_reports))
        .route("/admin/bookings", get(admin_bookings))
        .route(
            "/admin/subscriptions",
            get(admin_subscriptions).post(review_subscription),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ))
        .with_state(state)
}
