// libs/admin-cell/src/handlers.rs
use std::sync::Arc;
use axum::{extract::State, Json};
use tracing::error;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    AdminError, BookingsResponse, ReportsResponse, ReviewAction, StatsResponse,
    SubscriptionActionRequest, SubscriptionActionResponse, SubscriptionsResponse, UsersResponse,
};
use crate::services::directory::DirectoryService;
use crate::services::reporting::ReportingService;
use crate::services::review::ReviewService;

/// Store failures surface as a stable per-route message; the underlying
/// error goes to the log, not the client.
fn map_admin_error(err: AdminError, database_message: &str) -> AppError {
    match err {
        AdminError::MissingFields => AppError::BadRequest("Missing required fields".to_string()),
        AdminError::InvalidAction(action) => {
            AppError::BadRequest(format!("Invalid action: {}", action))
        }
        AdminError::NotFound => AppError::NotFound("Subscription not found".to_string()),
        AdminError::AlreadyFinalized(status) => {
            AppError::Conflict(format!("Subscription already {}", status))
        }
        AdminError::DatabaseError(e) => {
            error!("Admin store error: {}", e);
            AppError::Database(database_message.to_string())
        }
    }
}

/// GET /admin/stats
pub async fn admin_stats(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<StatsResponse>, AppError> {
    let service = ReportingService::new(&config);
    let stats = service
        .stats()
        .await
        .map_err(|e| map_admin_error(e, "Failed to fetch stats"))?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

/// GET /admin/users
pub async fn admin_users(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<UsersResponse>, AppError> {
    let service = DirectoryService::new(&config);
    let users = service
        .users()
        .await
        .map_err(|e| map_admin_error(e, "Failed to fetch users"))?;

    Ok(Json(UsersResponse {
        success: true,
        users,
    }))
}

/// GET /admin/reports
pub async fn admin_reports(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<ReportsResponse>, AppError> {
    let service = ReportingService::new(&config);
    let reports = service
        .all_reports()
        .await
        .map_err(|e| map_admin_error(e, "Failed to fetch reports"))?;

    Ok(Json(ReportsResponse {
        success: true,
        reports,
    }))
}

/// GET /admin/bookings
pub async fn admin_bookings(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<BookingsResponse>, AppError> {
    let service = ReportingService::new(&config);
    let bookings = service
        .all_bookings()
        .await
        .map_err(|e| map_admin_error(e, "Failed to fetch bookings"))?;

    Ok(Json(BookingsResponse {
        success: true,
        bookings,
    }))
}

/// GET /admin/subscriptions
pub async fn admin_subscriptions(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<SubscriptionsResponse>, AppError> {
    let service = ReportingService::new(&config);
    let subscriptions = service
        .all_subscriptions()
        .await
        .map_err(|e| map_admin_error(e, "Failed to fetch subscriptions"))?;

    Ok(Json(SubscriptionsResponse {
        success: true,
        subscriptions,
    }))
}

/// POST /admin/subscriptions
pub async fn review_subscription(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<SubscriptionActionRequest>,
) -> Result<Json<SubscriptionActionResponse>, AppError> {
    let (subscription_id, action) = parse_review_request(request)
        .map_err(|e| map_admin_error(e, "Failed to update subscription"))?;

    let service = ReviewService::new(&config);
    let subscription = service
        .act(&subscription_id, action)
        .await
        .map_err(|e| map_admin_error(e, "Failed to update subscription"))?;

    let message = format!("Subscription {} successfully", subscription.status);

    Ok(Json(SubscriptionActionResponse {
        success: true,
        subscription,
        message,
    }))
}

fn parse_review_request(
    request: SubscriptionActionRequest,
) -> Result<(String, ReviewAction), AdminError> {
    let subscription_id = request
        .subscription_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(AdminError::MissingFields)?;

    let action_raw = request
        .action
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or(AdminError::MissingFields)?;

    let action = ReviewAction::parse(action_raw)
        .ok_or_else(|| AdminError::InvalidAction(action_raw.to_string()))?;

    Ok((subscription_id.to_string(), action))
}
