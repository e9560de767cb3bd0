pub mod assessments;
pub mod assignments;
pub mod common;
pub mod evaluations;
pub mod extraction;
pub mod files;
pub mod submissions;

pub use common::error_code::ErrorCode;
pub use common::response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
