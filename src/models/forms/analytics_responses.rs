use crate::models::forms::entities::FieldType;
use serde::Serialize;
use ts_rs::TS;

/// 表单统计响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct FormAnalyticsResponse {
    pub form_id: i64,
    // 当前应答人数（班级指派按当前花名册解析）
    pub total_assigned: i64,
    pub responses: i64,
    // 回复率（百分比，一位小数；应答人数为 0 时为 0）
    pub response_rate: f64,
    // 每名应答学生的回复状态，按学号、姓名排序
    pub student_status: Vec<StudentStatusEntry>,
    // 逐字段统计，按表单字段定义顺序
    pub field_stats: Vec<FieldStats>,
}

/// 学生回复状态
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub enum ResponseStatus {
    Responded,
    NotResponded,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct StudentStatusEntry {
    pub student_id: i64,
    pub name: String,
    pub roll_number: i32,
    pub status: ResponseStatus,
}

/// 单个字段的统计
/// 选项类字段填 option_stats（按声明选项顺序），自由文本字段填 values（按提交顺序）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct FieldStats {
    pub label: String,
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_stats: Option<Vec<OptionStat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

/// 单个选项的计数
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct OptionStat {
    pub option: String,
    pub count: i64,
    // 占已回复数的百分比，一位小数；无回复时为 0
    pub percentage: f64,
}
