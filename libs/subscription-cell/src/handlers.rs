// libs/subscription-cell/src/handlers.rs
use std::sync::Arc;
use axum::{extract::State, Extension, Json};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    SubmitSubscriptionRequest, SubmitSubscriptionResponse, SubscriptionError,
    SubscriptionStatusResponse,
};
use crate::services::subscription::SubscriptionService;

/// POST /subscriptions/submit
pub async fn submit_subscription(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<SubmitSubscriptionRequest>,
) -> Result<Json<SubmitSubscriptionResponse>, AppError> {
    let service = SubscriptionService::new(&config);
    let subscription = service
        .submit(request, &user)
        .await
        .map_err(|e| match e {
            SubscriptionError::MissingFields => {
                AppError::BadRequest("Missing required fields".to_string())
            }
            SubscriptionError::UnknownPlan(plan) => {
                AppError::BadRequest(format!("Unknown plan: {}", plan))
            }
            SubscriptionError::DatabaseError(_) => {
                AppError::Database("Failed to submit subscription".to_string())
            }
        })?;

    Ok(Json(SubmitSubscriptionResponse {
        success: true,
        subscription,
        message: "Subscription submitted for approval".to_string(),
    }))
}

/// GET /subscriptions/status
pub async fn subscription_status(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<SubscriptionStatusResponse>, AppError> {
    let service = SubscriptionService::new(&config);
    let (subscription, has_active_subscription) = service
        .status_for_user(&user.id)
        .await
        .map_err(|_| AppError::Database("Failed to fetch subscription".to_string()))?;

    Ok(Json(SubscriptionStatusResponse {
        success: true,
        subscription,
        has_active_subscription,
    }))
}
