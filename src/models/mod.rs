pub mod attendance;
pub mod auth;
pub mod common;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod grades;
pub mod reports;
pub mod semesters;
pub mod users;

pub use common::error_code::ErrorCode;
pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 程序启动时间，用于统计预处理耗时
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
