pub mod directory;
pub mod reporting;
pub mod review;
