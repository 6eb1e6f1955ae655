//! 表单存储操作

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::form_responses::{Column as ResponseColumn, Entity as FormResponses};
use crate::entity::form_targets::{
    ActiveModel as FormTargetActiveModel, Column as TargetColumn, Entity as FormTargets,
};
use crate::entity::forms::{ActiveModel, Column, Entity as Forms};
use crate::errors::{FormSystemError, Result};
use crate::models::{
    PaginationInfo,
    forms::{
        entities::{Form, FormAssignment},
        requests::{CreateFormRequest, FormListQuery, UpdateFormRequest},
        responses::{FormListItem, FormListResponse},
    },
    students::entities::Student,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建表单
    pub async fn create_form_impl(&self, created_by: i64, req: CreateFormRequest) -> Result<Form> {
        let now = chrono::Utc::now().timestamp();
        let fields_json = serde_json::to_string(&req.fields)?;

        let (assigned_standard, assigned_division, target_ids) = match &req.assigned_to {
            FormAssignment::Class { standard, division } => {
                (Some(*standard), Some(division.clone()), vec![])
            }
            FormAssignment::Students { student_ids } => {
                // 去重，保持首次出现的顺序
                let mut seen = HashSet::new();
                let ids: Vec<i64> = student_ids
                    .iter()
                    .copied()
                    .filter(|id| seen.insert(*id))
                    .collect();
                (None, None, ids)
            }
        };

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            fields: Set(fields_json),
            assigned_standard: Set(assigned_standard),
            assigned_division: Set(assigned_division),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("创建表单失败: {e}")))?;

        // 定向指派时写入快照
        self.set_form_targets_impl(result.id, &target_ids).await?;

        result.into_form(target_ids)
    }

    /// 通过 ID 获取表单
    pub async fn get_form_by_id_impl(&self, form_id: i64) -> Result<Option<Form>> {
        let result = Forms::find_by_id(form_id)
            .one(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询表单失败: {e}")))?;

        match result {
            Some(model) => {
                let target_ids = self.get_form_target_ids_impl(model.id).await?;
                Ok(Some(model.into_form(target_ids)?))
            }
            None => Ok(None),
        }
    }

    /// 分页列出表单（带回复计数）
    pub async fn list_forms_with_pagination_impl(
        &self,
        query: FormListQuery,
    ) -> Result<FormListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Forms::find();

        // 创建者筛选
        if let Some(created_by) = query.created_by {
            select = select.filter(Column::CreatedBy.eq(created_by));
        }

        // 搜索条件（按标题搜索）
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Title.contains(&escaped));
        }

        // 排序：最新创建的在前
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询表单总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询表单页数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询表单列表失败: {e}")))?;

        let form_ids: Vec<i64> = models.iter().map(|m| m.id).collect();

        // 批量查询定向指派快照
        let mut targets_map = self.get_targets_for_forms_impl(&form_ids).await?;

        // 批量统计回复数
        let mut count_map: HashMap<i64, i64> = HashMap::new();
        if !form_ids.is_empty() {
            let responses = FormResponses::find()
                .filter(ResponseColumn::FormId.is_in(form_ids.clone()))
                .all(&self.db)
                .await
                .map_err(|e| {
                    FormSystemError::database_operation(format!("查询表单回复失败: {e}"))
                })?;
            for response in responses {
                *count_map.entry(response.form_id).or_insert(0) += 1;
            }
        }

        let mut items = Vec::with_capacity(models.len());
        for model in models {
            let form_id = model.id;
            let target_ids = targets_map.remove(&form_id).unwrap_or_default();
            items.push(FormListItem {
                form: model.into_form(target_ids)?,
                response_count: count_map.get(&form_id).copied().unwrap_or(0),
            });
        }

        Ok(FormListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新表单
    ///
    /// 回复存在时的拒绝逻辑在业务层，这里只做写入。
    pub async fn update_form_impl(
        &self,
        form_id: i64,
        update: UpdateFormRequest,
    ) -> Result<Option<Form>> {
        // 先检查表单是否存在
        let existing = Forms::find_by_id(form_id)
            .one(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询表单失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(form_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(fields) = update.fields {
            model.fields = Set(serde_json::to_string(&fields)?);
        }

        // 指派目标变更：切换班级/定向时同步列和快照表
        if let Some(ref assigned_to) = update.assigned_to {
            match assigned_to {
                FormAssignment::Class { standard, division } => {
                    model.assigned_standard = Set(Some(*standard));
                    model.assigned_division = Set(Some(division.clone()));
                    self.set_form_targets_impl(form_id, &[]).await?;
                }
                FormAssignment::Students { student_ids } => {
                    model.assigned_standard = Set(None);
                    model.assigned_division = Set(None);
                    let mut seen = HashSet::new();
                    let ids: Vec<i64> = student_ids
                        .iter()
                        .copied()
                        .filter(|id| seen.insert(*id))
                        .collect();
                    self.set_form_targets_impl(form_id, &ids).await?;
                }
            }
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("更新表单失败: {e}")))?;

        self.get_form_by_id_impl(form_id).await
    }

    /// 删除表单，级联删除其回复和定向指派记录
    pub async fn delete_form_impl(&self, form_id: i64) -> Result<bool> {
        FormResponses::delete_many()
            .filter(ResponseColumn::FormId.eq(form_id))
            .exec(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("删除表单回复失败: {e}")))?;

        FormTargets::delete_many()
            .filter(TargetColumn::FormId.eq(form_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FormSystemError::database_operation(format!("删除表单指派记录失败: {e}"))
            })?;

        let result = Forms::delete_by_id(form_id)
            .exec(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("删除表单失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 列出指派覆盖某学生的全部表单
    ///
    /// 覆盖 = 学生当前班级匹配班级指派，或学生在定向指派快照中。
    /// 按创建时间倒序。
    pub async fn list_forms_for_student_impl(&self, student: &Student) -> Result<Vec<Form>> {
        // 定向指派命中的表单
        let targeted_ids: Vec<i64> = FormTargets::find()
            .filter(TargetColumn::StudentId.eq(student.id))
            .all(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询指派记录失败: {e}")))?
            .into_iter()
            .map(|m| m.form_id)
            .collect();

        let mut condition = Condition::any().add(
            Condition::all()
                .add(Column::AssignedStandard.eq(student.standard))
                .add(Column::AssignedDivision.eq(student.division.clone())),
        );
        if !targeted_ids.is_empty() {
            condition = condition.add(Column::Id.is_in(targeted_ids));
        }

        let models = Forms::find()
            .filter(condition)
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询表单失败: {e}")))?;

        let form_ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut targets_map = self.get_targets_for_forms_impl(&form_ids).await?;

        let mut forms = Vec::with_capacity(models.len());
        for model in models {
            let target_ids = targets_map.remove(&model.id).unwrap_or_default();
            forms.push(model.into_form(target_ids)?);
        }

        Ok(forms)
    }

    /// 获取表单的定向指派学生 ID 列表
    pub async fn get_form_target_ids_impl(&self, form_id: i64) -> Result<Vec<i64>> {
        let results = FormTargets::find()
            .filter(TargetColumn::FormId.eq(form_id))
            .all(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询指派记录失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.student_id).collect())
    }

    /// 批量获取多个表单的定向指派学生 ID
    async fn get_targets_for_forms_impl(&self, form_ids: &[i64]) -> Result<HashMap<i64, Vec<i64>>> {
        let mut map: HashMap<i64, Vec<i64>> = HashMap::new();
        if form_ids.is_empty() {
            return Ok(map);
        }

        let targets = FormTargets::find()
            .filter(TargetColumn::FormId.is_in(form_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| FormSystemError::database_operation(format!("查询指派记录失败: {e}")))?;

        for target in targets {
            map.entry(target.form_id).or_default().push(target.student_id);
        }

        Ok(map)
    }

    /// 重建表单的定向指派快照
    async fn set_form_targets_impl(&self, form_id: i64, student_ids: &[i64]) -> Result<()> {
        // 先删除旧的记录
        FormTargets::delete_many()
            .filter(TargetColumn::FormId.eq(form_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FormSystemError::database_operation(format!("删除旧指派记录失败: {e}"))
            })?;

        for student_id in student_ids {
            let model = FormTargetActiveModel {
                form_id: Set(form_id),
                student_id: Set(*student_id),
            };

            model.insert(&self.db).await.map_err(|e| {
                FormSystemError::database_operation(format!("创建指派记录失败: {e}"))
            })?;
        }

        Ok(())
    }
}
