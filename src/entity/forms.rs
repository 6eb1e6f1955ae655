//! 表单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "forms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    // JSON 序列化的字段定义列表，读取时反序列化为 Vec<FormField>
    #[sea_orm(column_type = "Text")]
    pub fields: String,
    pub assigned_standard: Option<i32>,
    pub assigned_division: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::form_responses::Entity")]
    FormResponses,
    #[sea_orm(has_many = "super::form_targets::Entity")]
    FormTargets,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::form_responses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormResponses.def()
    }
}

impl Related<super::form_targets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormTargets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    /// 转换为业务模型
    ///
    /// 定向指派的表单需要调用方先行查出 form_targets 中的学生 ID 列表；
    /// 班级指派的表单忽略 target_ids。
    pub fn into_form(
        self,
        target_ids: Vec<i64>,
    ) -> crate::errors::Result<crate::models::forms::entities::Form> {
        use crate::models::forms::entities::{Form, FormAssignment, FormField};
        use chrono::{DateTime, Utc};

        let fields: Vec<FormField> = serde_json::from_str(&self.fields)?;

        let assigned_to = match (self.assigned_standard, self.assigned_division) {
            (Some(standard), Some(division)) => FormAssignment::Class { standard, division },
            _ => FormAssignment::Students {
                student_ids: target_ids,
            },
        };

        Ok(Form {
            id: self.id,
            title: self.title,
            description: self.description,
            fields,
            assigned_to,
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
