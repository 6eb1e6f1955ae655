use crate::models::common::pagination::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 学生查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub standard: Option<i32>,
    pub division: Option<String>,
    pub search: Option<String>,
}

// 学生创建请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub name: String,
    pub roll_number: i32,
    pub standard: i32,
    pub division: String,
    pub parent_id: Option<i64>,
}

// 学生更新请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub roll_number: Option<i32>,
    pub standard: Option<i32>,
    pub division: Option<String>,
    pub parent_id: Option<i64>,
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub standard: Option<i32>,
    pub division: Option<String>,
    pub search: Option<String>,
}
