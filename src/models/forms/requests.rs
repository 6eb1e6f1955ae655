use crate::models::common::pagination::PaginationQuery;
use crate::models::forms::entities::{FormAnswer, FormAssignment, FormField};
use serde::Deserialize;
use ts_rs::TS;

/// 创建表单请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct CreateFormRequest {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FormField>,
    pub assigned_to: FormAssignment,
}

/// 更新表单请求
/// 仅在表单尚无回复时允许（定义锁定后统计才有意义）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct UpdateFormRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Option<Vec<FormField>>,
    pub assigned_to: Option<FormAssignment>,
}

/// 表单列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct FormListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone)]
pub struct FormListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub created_by: Option<i64>,
    pub search: Option<String>,
}

/// 提交表单回复请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct SubmitResponseRequest {
    pub student_id: i64,
    pub answers: Vec<FormAnswer>,
}

/// 按学生查询待办/已完成表单的参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct StudentFormsParams {
    pub student_id: i64,
}
