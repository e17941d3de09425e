// libs/admin-cell/src/lib.rs
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    AdminError, AdminStats, AdminUserView, ReviewAction, SubscriptionActionRequest,
    SubscriptionActionResponse,
};
pub use router::admin_routes;

// Re-export for external use
pub mod api {
    pub use crate::services::directory::DirectoryService;
    pub use crate::services::reporting::ReportingService;
    pub use crate::services::review::ReviewService;
}
