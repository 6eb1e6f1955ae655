use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FormService;
use crate::middlewares::RequireJWT;
use crate::models::forms::entities::{FormAssignment, validate_definition};
use crate::models::forms::requests::UpdateFormRequest;
use crate::models::forms::responses::FormDetailResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn update_form(
    service: &FormService,
    request: &HttpRequest,
    form_id: i64,
    req: UpdateFormRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user_role = RequireJWT::extract_user_role(request);

    // 获取表单信息
    let form = match storage.get_form_by_id(form_id).await {
        Ok(Some(f)) => f,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FormNotFound,
                "表单不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询表单失败: {e}"),
                )),
            );
        }
    };

    // 权限检查：只有表单创建者或管理员才能修改
    if user_role != Some(UserRole::Admin) && form.created_by != user_id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只能修改自己创建的表单",
        )));
    }

    // 已有回复的表单定义不可再修改，否则统计会对着不存在的字段计算
    match storage.count_responses_for_form(form_id).await {
        Ok(0) => {}
        Ok(count) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::FormLocked,
                format!("表单已有 {count} 份回复，定义已锁定"),
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("统计表单回复失败: {e}"),
                )),
            );
        }
    }

    // 校验更新后的定义（对未更新的部分沿用现值）
    let title = req.title.as_deref().unwrap_or(&form.title);
    let fields = req.fields.as_deref().unwrap_or(&form.fields);
    let assigned_to = req.assigned_to.as_ref().unwrap_or(&form.assigned_to);
    let mut violations = validate_definition(title, fields, assigned_to);

    // 定向指派的学生必须真实存在
    if let FormAssignment::Students { student_ids } = assigned_to
        && !student_ids.is_empty()
    {
        match storage.get_students_by_ids(student_ids).await {
            Ok(found) => {
                let found_ids: std::collections::HashSet<i64> =
                    found.iter().map(|s| s.id).collect();
                for id in student_ids {
                    if !found_ids.contains(id) {
                        violations.push(format!("学生不存在: {id}"));
                    }
                }
            }
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("校验指派学生失败: {e}"),
                    )),
                );
            }
        }
    }

    if !violations.is_empty() {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error(
            ErrorCode::FormValidationFailed,
            violations,
            "表单定义不合法",
        )));
    }

    match storage.update_form(form_id, req).await {
        Ok(Some(form)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FormDetailResponse {
                form,
                response_count: 0,
            },
            "表单已更新",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FormNotFound,
            "表单不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新表单失败: {e}"),
            )),
        ),
    }
}
