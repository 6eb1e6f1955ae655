//! 业务数据模型
//!
//! 与 entity 模块的数据库实体分离，所有对外（HTTP/前端类型导出）的
//! 结构都定义在这里。

pub mod auth;
pub mod common;
pub mod forms;
pub mod students;
pub mod users;

pub use common::error_code::ErrorCode;
pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

// 应用启动时间，用于统计启动耗时
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
