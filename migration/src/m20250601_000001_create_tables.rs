use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        // 学生是花名册记录而非登录账号，通过 parent_id 关联监护人账号
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::RollNumber).integer().not_null())
                    .col(ColumnDef::new(Students::Standard).integer().not_null())
                    .col(ColumnDef::new(Students::Division).string().not_null())
                    .col(ColumnDef::new(Students::ParentId).big_integer().null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::ParentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建表单表
        // fields 列存放 JSON 序列化的字段定义；班级指派用
        // assigned_standard + assigned_division，定向指派用 form_targets 关联表
        manager
            .create_table(
                Table::create()
                    .table(Forms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Forms::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Forms::Title).string().not_null())
                    .col(ColumnDef::new(Forms::Description).text().null())
                    .col(ColumnDef::new(Forms::Fields).text().not_null())
                    .col(ColumnDef::new(Forms::AssignedStandard).integer().null())
                    .col(ColumnDef::new(Forms::AssignedDivision).string().null())
                    .col(ColumnDef::new(Forms::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Forms::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Forms::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Forms::Table, Forms::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建表单定向指派关联表（指派给指定学生时的快照）
        manager
            .create_table(
                Table::create()
                    .table(FormTargets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FormTargets::FormId).big_integer().not_null())
                    .col(
                        ColumnDef::new(FormTargets::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(FormTargets::FormId)
                            .col(FormTargets::StudentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FormTargets::Table, FormTargets::FormId)
                            .to(Forms::Table, Forms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FormTargets::Table, FormTargets::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建表单回复表
        manager
            .create_table(
                Table::create()
                    .table(FormResponses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormResponses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FormResponses::FormId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FormResponses::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FormResponses::ParentId).big_integer().null())
                    .col(ColumnDef::new(FormResponses::Answers).text().not_null())
                    .col(
                        ColumnDef::new(FormResponses::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FormResponses::Table, FormResponses::FormId)
                            .to(Forms::Table, Forms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FormResponses::Table, FormResponses::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FormResponses::Table, FormResponses::ParentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 用户表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        // 学生表索引：按班级（年级 + 分班）查询花名册
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_class")
                    .table(Students::Table)
                    .col(Students::Standard)
                    .col(Students::Division)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_parent_id")
                    .table(Students::Table)
                    .col(Students::ParentId)
                    .to_owned(),
            )
            .await?;

        // 表单表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_forms_created_by")
                    .table(Forms::Table)
                    .col(Forms::CreatedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_forms_class")
                    .table(Forms::Table)
                    .col(Forms::AssignedStandard)
                    .col(Forms::AssignedDivision)
                    .to_owned(),
            )
            .await?;

        // 表单回复表索引
        // (form_id, student_id) 唯一索引：同一学生对同一表单至多一条回复，
        // 并发重复提交由数据库层拒绝
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_form_responses_form_student")
                    .table(FormResponses::Table)
                    .col(FormResponses::FormId)
                    .col(FormResponses::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_form_responses_student_id")
                    .table(FormResponses::Table)
                    .col(FormResponses::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(FormResponses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FormTargets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Forms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    Name,
    RollNumber,
    Standard,
    Division,
    ParentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Forms {
    #[sea_orm(iden = "forms")]
    Table,
    Id,
    Title,
    Description,
    Fields,
    AssignedStandard,
    AssignedDivision,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FormTargets {
    #[sea_orm(iden = "form_targets")]
    Table,
    FormId,
    StudentId,
}

#[derive(DeriveIden)]
enum FormResponses {
    #[sea_orm(iden = "form_responses")]
    Table,
    Id,
    FormId,
    StudentId,
    ParentId,
    Answers,
    CreatedAt,
}
