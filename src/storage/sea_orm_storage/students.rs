//! 学生花名册存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{FormSystemError, Result};
use crate::models::{
    PaginationInfo,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建学生
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            roll_number: Set(req.roll_number),
            standard: Set(req.standard),
            division: Set(req.division),
            parent_id: Set(req.parent_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("创建学生失败: {e}")))?;

        Ok(result.into_student())
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Students::find();

        // 班级筛选
        if let Some(standard) = query.standard {
            select = select.filter(Column::Standard.eq(standard));
        }
        if let Some(ref division) = query.division {
            select = select.filter(Column::Division.eq(division.clone()));
        }

        // 搜索条件（按姓名搜索）
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        // 排序：班级内按学号
        select = select
            .order_by_asc(Column::Standard)
            .order_by_asc(Column::Division)
            .order_by_asc(Column::RollNumber);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询学生总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询学生页数失败: {e}")))?;

        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新学生信息
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        // 先检查学生是否存在
        let existing = self.get_student_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(roll_number) = update.roll_number {
            model.roll_number = Set(roll_number);
        }

        if let Some(standard) = update.standard {
            model.standard = Set(standard);
        }

        if let Some(division) = update.division {
            model.division = Set(division);
        }

        if let Some(parent_id) = update.parent_id {
            model.parent_id = Set(Some(parent_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("更新学生失败: {e}")))?;

        self.get_student_by_id_impl(id).await
    }

    /// 删除学生
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 查询班级当前花名册
    ///
    /// 结果反映查询时刻的班级成员，按学号、姓名排序，
    /// 供指派解析和统计输出使用（输出顺序因此是确定的）。
    pub async fn students_in_class_impl(
        &self,
        standard: i32,
        division: &str,
    ) -> Result<Vec<Student>> {
        let results = Students::find()
            .filter(Column::Standard.eq(standard))
            .filter(Column::Division.eq(division))
            .order_by_asc(Column::RollNumber)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询班级花名册失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_student()).collect())
    }

    /// 按 ID 集合查询学生，按学号、姓名排序
    pub async fn get_students_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Student>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let results = Students::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::RollNumber)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_student()).collect())
    }

    /// 查询某监护人名下的学生
    pub async fn list_students_by_parent_impl(&self, parent_id: i64) -> Result<Vec<Student>> {
        let results = Students::find()
            .filter(Column::ParentId.eq(parent_id))
            .order_by_asc(Column::RollNumber)
            .all(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询监护学生失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_student()).collect())
    }
}
