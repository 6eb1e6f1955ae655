//! 表单指派解析
//!
//! 把表单的指派目标解析为当前应答的学生集合：
//! - 班级指派每次都重新查询当前花名册，转入班级的学生立即进入应答名单，
//!   转出的学生立即离开名单（动态成员）
//! - 定向指派返回创建时固定的学生快照，不随转班变化
//!
//! 两种行为的不对称是业务语义的一部分，解析时不做任何"统一"处理。

use std::sync::Arc;

use crate::errors::Result;
use crate::models::forms::entities::{Form, FormAssignment};
use crate::models::students::entities::Student;
use crate::storage::Storage;

/// 解析表单当前的应答学生名单，按学号、姓名排序
pub async fn resolve_roster(storage: &Arc<dyn Storage>, form: &Form) -> Result<Vec<Student>> {
    match &form.assigned_to {
        FormAssignment::Class { standard, division } => {
            storage.students_in_class(*standard, division).await
        }
        FormAssignment::Students { student_ids } => storage.get_students_by_ids(student_ids).await,
    }
}

/// 判断某学生是否在表单的应答名单中（不考虑是否已回复）
///
/// "仍欠一份回复" = 本判断为真且尚无 (form, student) 的回复记录，
/// 提交和待办查询在各自的路径上组合这两个条件。
pub async fn roster_contains(
    storage: &Arc<dyn Storage>,
    form: &Form,
    student_id: i64,
) -> Result<bool> {
    match &form.assigned_to {
        FormAssignment::Class { standard, division } => {
            // 按学生当前班级判断，避免为一次成员判断拉取全班名单
            let student = storage.get_student_by_id(student_id).await?;
            Ok(student.is_some_and(|s| s.standard == *standard && s.division == *division))
        }
        FormAssignment::Students { student_ids } => Ok(student_ids.contains(&student_id)),
    }
}
