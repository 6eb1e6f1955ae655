//! 表单回复存储操作

use super::SeaOrmStorage;
use crate::entity::form_responses::{ActiveModel, Column, Entity as FormResponses};
use crate::errors::{FormSystemError, Result};
use crate::models::forms::entities::{FormAnswer, FormResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};

/// 唯一约束冲突判定
///
/// (form_id, student_id) 唯一索引被触发说明同一学生重复提交，
/// 包括并发双写时后到的一方。
fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl SeaOrmStorage {
    /// 写入一条回复
    ///
    /// 重复的 (form_id, student_id) 由数据库唯一索引拒绝并映射为
    /// DuplicateSubmission，不做先查后写。
    pub async fn create_form_response_impl(
        &self,
        form_id: i64,
        student_id: i64,
        parent_id: i64,
        answers: &[FormAnswer],
    ) -> Result<FormResponse> {
        let now = chrono::Utc::now().timestamp();
        let answers_json = serde_json::to_string(answers)?;

        let model = ActiveModel {
            form_id: Set(form_id),
            student_id: Set(student_id),
            parent_id: Set(Some(parent_id)),
            answers: Set(answers_json),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                FormSystemError::duplicate_submission(format!(
                    "学生 {student_id} 已提交过表单 {form_id}"
                ))
            } else {
                FormSystemError::database_operation(format!("创建表单回复失败: {e}"))
            }
        })?;

        result.into_form_response()
    }

    /// 查询某学生对某表单的回复
    pub async fn get_response_by_form_and_student_impl(
        &self,
        form_id: i64,
        student_id: i64,
    ) -> Result<Option<FormResponse>> {
        let result = FormResponses::find()
            .filter(Column::FormId.eq(form_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询表单回复失败: {e}")))?;

        match result {
            Some(model) => Ok(Some(model.into_form_response()?)),
            None => Ok(None),
        }
    }

    /// 统计表单回复数
    pub async fn count_responses_for_form_impl(&self, form_id: i64) -> Result<i64> {
        let count = FormResponses::find()
            .filter(Column::FormId.eq(form_id))
            .count(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("统计表单回复失败: {e}")))?;

        Ok(count as i64)
    }

    /// 列出表单全部回复
    ///
    /// 按提交顺序（created_at，再按 id 保证稳定），自由文本统计依赖这个顺序。
    pub async fn list_responses_for_form_impl(&self, form_id: i64) -> Result<Vec<FormResponse>> {
        let models = FormResponses::find()
            .filter(Column::FormId.eq(form_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询表单回复失败: {e}")))?;

        models.into_iter().map(|m| m.into_form_response()).collect()
    }

    /// 列出某学生的全部回复
    pub async fn list_responses_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<FormResponse>> {
        let models = FormResponses::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询学生回复失败: {e}")))?;

        models.into_iter().map(|m| m.into_form_response()).collect()
    }
}
