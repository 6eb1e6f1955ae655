//! 表单回复实体
//!
//! (form_id, student_id) 上有唯一索引，重复提交由数据库层拒绝。
//! 回复是只追加的：创建后不再更新，仅随表单级联删除。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "form_responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub form_id: i64,
    pub student_id: i64,
    pub parent_id: Option<i64>,
    // JSON 序列化的答案列表，读取时反序列化为 Vec<FormAnswer>
    #[sea_orm(column_type = "Text")]
    pub answers: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forms::Entity",
        from = "Column::FormId",
        to = "super::forms::Column::Id"
    )]
    Form,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ParentId",
        to = "super::users::Column::Id"
    )]
    Parent,
}

impl Related<super::forms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Form.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_form_response(
        self,
    ) -> crate::errors::Result<crate::models::forms::entities::FormResponse> {
        use crate::models::forms::entities::{FormAnswer, FormResponse};
        use chrono::{DateTime, Utc};

        let answers: Vec<FormAnswer> = serde_json::from_str(&self.answers)?;

        Ok(FormResponse {
            id: self.id,
            form_id: self.form_id,
            student_id: self.student_id,
            parent_id: self.parent_id,
            answers,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        })
    }
}
