// libs/subscription-cell/src/lib.rs
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    plan_amount, NewSubscription, SubmitSubscriptionRequest, Subscription, SubscriptionError,
    SubscriptionStatus, PLAN_CATALOG,
};
pub use router::subscription_routes;

// Re-export for external use
pub mod api {
    pub use crate::services::subscription::SubscriptionService;
}
