// libs/subscription-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Plan catalog. Keys are what the client submits; amounts are what the
/// server charges, never the other way around.
pub const PLAN_CATALOG: [(&str, i64); 3] = [("basic", 1), ("pro", 999), ("enterprise", 2499)];

pub fn plan_amount(plan: &str) -> Option<i64> {
    PLAN_CATALOG
        .iter()
        .find(|(name, _)| *name == plan)
        .map(|(_, amount)| *amount)
}

// ==============================================================================
// STATE MACHINE
// ==============================================================================

/// Subscription lifecycle. Both outcomes of review are terminal; a
/// finalized record never transitions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubscriptionStatus {
    pub fn can_transition_to(&self, next: SubscriptionStatus) -> bool {
        matches!(
            (self, next),
            (SubscriptionStatus::Pending, SubscriptionStatus::Approved)
                | (SubscriptionStatus::Pending, SubscriptionStatus::Rejected)
        )
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, SubscriptionStatus::Pending)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionStatus::Pending => write!(f, "pending"),
            SubscriptionStatus::Approved => write!(f, "approved"),
            SubscriptionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

// ==============================================================================
// CORE SUBSCRIPTION MODELS
// ==============================================================================

/// A persisted row in the `subscriptions` collection. Email and name are
/// snapshots captured from the token at submission time, so later reads
/// never need an identity-provider round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub plan: String,
    pub amount: i64,
    pub transaction_id: String,
    pub upi_id: Option<String>,
    pub status: SubscriptionStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Active means approved and not yet past its validity window.
    /// Expiry is always recomputed from `end_date`, never stored.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Approved
            && self.end_date.map(|end| end > now).unwrap_or(false)
    }
}

/// Insert payload. Validity dates stay absent until approval.
#[derive(Debug, Clone, Serialize)]
pub struct NewSubscription {
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub plan: String,
    pub amount: i64,
    pub transaction_id: String,
    pub upi_id: Option<String>,
    pub status: SubscriptionStatus,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSubscriptionRequest {
    pub plan: Option<String>,
    pub transaction_id: Option<String>,
    pub upi_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitSubscriptionResponse {
    pub success: bool,
    pub subscription: Subscription,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    pub success: bool,
    pub subscription: Option<Subscription>,
    pub has_active_subscription: bool,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum SubscriptionError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
