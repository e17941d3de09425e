// libs/admin-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use subscription_cell::models::{Subscription, SubscriptionStatus};

// ==============================================================================
// DASHBOARD MODELS
// ==============================================================================

/// Headline numbers for the admin dashboard, computed fresh from the
/// store on every request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: usize,
    pub total_reports: usize,
    pub total_bookings: usize,
    pub total_revenue: i64,
    pub pending_bookings: usize,
    pub completed_bookings: usize,
}

/// One row of the admin user directory. Identity fields come from the
/// snapshots stored on report and booking rows; no identity-provider
/// lookups happen at read time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub reports_count: usize,
    pub bookings_count: usize,
}

// ==============================================================================
// SUBSCRIPTION REVIEW
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    /// Strict parse: only the two review verbs are accepted.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "approve" => Some(ReviewAction::Approve),
            "reject" => Some(ReviewAction::Reject),
            _ => None,
        }
    }

    pub fn target_status(&self) -> SubscriptionStatus {
        match self {
            ReviewAction::Approve => SubscriptionStatus::Approved,
            ReviewAction::Reject => SubscriptionStatus::Rejected,
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionActionRequest {
    pub subscription_id: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: AdminStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<AdminUserView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportsResponse {
    pub success: bool,
    pub reports: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingsResponse {
    pub success: bool,
    pub bookings: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionsResponse {
    pub success: bool,
    pub subscriptions: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionActionResponse {
    pub success: bool,
    pub subscription: Subscription,
    pub message: String,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Subscription not found")]
    NotFound,

    #[error("Subscription already {0}")]
    AlreadyFinalized(SubscriptionStatus),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
