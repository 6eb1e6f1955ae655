use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生实体
// 学生是花名册记录，parent_id 关联监护人登录账号
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub name: String,
    // 学号，班内花名册排序键
    pub roll_number: i32,
    // 年级
    pub standard: i32,
    // 分班（如 "A" / "B"）
    pub division: String,
    pub parent_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
