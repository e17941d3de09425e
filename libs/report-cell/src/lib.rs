// Report Cell - upload analysis pipeline, chat follow-up, report listing
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    AnalyzeReportResponse,
    ChatRequest,
    ChatResponse,
    ChatTurn,
    HealthReport,
    NewHealthReport,
    Relationship,
    ReportError,
    UploadedFile,
};

pub use router::report_routes;

pub mod api {
    pub use crate::services::analysis::AnalysisService;
    pub use crate::services::chat::ChatService;
    pub use crate::services::store::ReportStore;
}
