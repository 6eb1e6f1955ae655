use crate::models::common::pagination::PaginationInfo;
use crate::models::forms::entities::{Form, FormResponse};
use serde::Serialize;
use ts_rs::TS;

// 表单列表项，带回复计数（教师视角）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct FormListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub form: Form,
    pub response_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct FormListResponse {
    pub items: Vec<FormListItem>,
    pub pagination: PaginationInfo,
}

// 表单详情响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct FormDetailResponse {
    pub form: Form,
    pub response_count: i64,
}

// 学生待办表单响应（按创建时间倒序）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct PendingFormsResponse {
    pub items: Vec<Form>,
}

// 学生已完成表单项
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct CompletedFormItem {
    pub form: Form,
    pub response: FormResponse,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct CompletedFormsResponse {
    pub items: Vec<CompletedFormItem>,
}
