//! 学生实体
//!
//! 学生是花名册记录而非登录账号，parent_id 指向提交表单回复的监护人账号。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub roll_number: i32,
    pub standard: i32,
    pub division: String,
    pub parent_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ParentId",
        to = "super::users::Column::Id"
    )]
    Parent,
    #[sea_orm(has_many = "super::form_responses::Entity")]
    FormResponses,
    #[sea_orm(has_many = "super::form_targets::Entity")]
    FormTargets,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parent.def()
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
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::Student;
        use chrono::{DateTime, Utc};

        Student {
            id: self.id,
            name: self.name,
            roll_number: self.roll_number,
            standard: self.standard,
            division: self.division,
            parent_id: self.parent_id,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
