use std::sync::Arc;

use crate::models::{
    forms::{
        entities::{Form, FormAnswer, FormResponse},
        requests::{CreateFormRequest, FormListQuery, UpdateFormRequest},
        responses::FormListResponse,
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 学生花名册管理方法
    // 创建学生
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    // 通过ID获取学生信息
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    // 列出学生
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    // 更新学生信息
    async fn update_student(&self, id: i64, update: UpdateStudentRequest)
    -> Result<Option<Student>>;
    // 删除学生
    async fn delete_student(&self, id: i64) -> Result<bool>;
    // 查询班级当前花名册（按学号、姓名排序）
    async fn students_in_class(&self, standard: i32, division: &str) -> Result<Vec<Student>>;
    // 按 ID 集合查询学生（按学号、姓名排序）
    async fn get_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>>;
    // 查询某监护人名下的学生
    async fn list_students_by_parent(&self, parent_id: i64) -> Result<Vec<Student>>;

    /// 表单管理方法
    // 创建表单（定向指派时一并写入 form_targets 快照）
    async fn create_form(&self, created_by: i64, form: CreateFormRequest) -> Result<Form>;
    // 通过ID获取表单
    async fn get_form_by_id(&self, form_id: i64) -> Result<Option<Form>>;
    // 分页列出表单（带回复计数）
    async fn list_forms_with_pagination(&self, query: FormListQuery) -> Result<FormListResponse>;
    // 更新表单
    async fn update_form(&self, form_id: i64, update: UpdateFormRequest) -> Result<Option<Form>>;
    // 删除表单，级联删除其回复和定向指派记录
    async fn delete_form(&self, form_id: i64) -> Result<bool>;
    // 列出指派覆盖某学生的全部表单（按创建时间倒序）
    async fn list_forms_for_student(&self, student: &Student) -> Result<Vec<Form>>;

    /// 表单回复方法
    // 写入一条回复；(form_id, student_id) 已存在时返回 DuplicateSubmission
    async fn create_form_response(
        &self,
        form_id: i64,
        student_id: i64,
        parent_id: i64,
        answers: &[FormAnswer],
    ) -> Result<FormResponse>;
    // 查询某学生对某表单的回复
    async fn get_response_by_form_and_student(
        &self,
        form_id: i64,
        student_id: i64,
    ) -> Result<Option<FormResponse>>;
    // 统计表单回复数
    async fn count_responses_for_form(&self, form_id: i64) -> Result<i64>;
    // 列出表单全部回复（按提交顺序）
    async fn list_responses_for_form(&self, form_id: i64) -> Result<Vec<FormResponse>>;
    // 列出某学生的全部回复
    async fn list_responses_by_student(&self, student_id: i64) -> Result<Vec<FormResponse>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
