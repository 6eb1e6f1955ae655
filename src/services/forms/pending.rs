use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FormService;
use crate::middlewares::RequireJWT;
use crate::models::forms::requests::StudentFormsParams;
use crate::models::forms::responses::PendingFormsResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 列出某学生的待办表单
///
/// 待办 = 指派覆盖该学生且尚未提交回复。班级指派按学生当前班级判断，
/// 所以转入班级的学生会立即看到该班的历史表单。
/// 结果按表单创建时间倒序（最新的待办在前）。
pub async fn list_pending_forms(
    service: &FormService,
    request: &HttpRequest,
    params: StudentFormsParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match RequireJWT::extract_user_claims(request) {
        Some(u) => u,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    let student = match storage.get_student_by_id(params.student_id).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "学生不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询学生失败: {e}"),
                )),
            );
        }
    };

    // 家长只能查询自己监护的学生
    if user.role == UserRole::Parent && student.parent_id != Some(user.id) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::NotStudentGuardian,
            "只能查询自己监护的学生",
        )));
    }

    // 覆盖该学生的全部表单（已按创建时间倒序）
    let forms = match storage.list_forms_for_student(&student).await {
        Ok(forms) => forms,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询表单失败: {e}"),
                )),
            );
        }
    };

    // 过滤掉已提交回复的表单
    let responses = match storage.list_responses_by_student(student.id).await {
        Ok(r) => r,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询学生回复失败: {e}"),
                )),
            );
        }
    };
    let answered: std::collections::HashSet<i64> = responses.iter().map(|r| r.form_id).collect();

    let items: Vec<_> = forms
        .into_iter()
        .filter(|f| !answered.contains(&f.id))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(PendingFormsResponse { items }, "查询成功")))
}
