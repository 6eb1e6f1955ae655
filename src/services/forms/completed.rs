use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FormService;
use crate::middlewares::RequireJWT;
use crate::models::forms::requests::StudentFormsParams;
use crate::models::forms::responses::{CompletedFormItem, CompletedFormsResponse};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 列出某学生已完成的表单及对应回复
///
/// 按提交时间倒序（最近完成的在前）。
pub async fn list_completed_forms(
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

    // 逐表单取定义；表单删除会级联删除回复，查不到表单的记录直接跳过
    let mut items = Vec::with_capacity(responses.len());
    let mut form_cache: HashMap<i64, crate::models::forms::entities::Form> = HashMap::new();
    for response in responses {
        let form = if let Some(form) = form_cache.get(&response.form_id) {
            form.clone()
        } else {
            match storage.get_form_by_id(response.form_id).await {
                Ok(Some(form)) => {
                    form_cache.insert(response.form_id, form.clone());
                    form
                }
                Ok(None) => continue,
                Err(e) => {
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("查询表单失败: {e}"),
                        ),
                    ));
                }
            }
        };
        items.push(CompletedFormItem { form, response });
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CompletedFormsResponse { items },
        "查询成功",
    )))
}
