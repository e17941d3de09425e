use std::sync::Arc;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{create_booking, get_bookings};

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    // Creation tolerates anonymous callers; listing requires identity.
    let public_routes = Router::new().route("/book-doctor", post(create_booking));

    let protected_routes = Router::new()
        .route("/book-doctor", get(get_bookings))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public_routes.merge(protected_routes).with_state(state)
}
