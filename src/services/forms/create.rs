use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::FormService;
use crate::models::forms::entities::{FormAssignment, validate_definition};
use crate::models::forms::requests::CreateFormRequest;
use crate::models::forms::responses::FormDetailResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_form(
    service: &FormService,
    request: &HttpRequest,
    created_by: i64,
    req: CreateFormRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 校验表单定义，一次性收集所有违反的约束
    let mut violations = validate_definition(&req.title, &req.fields, &req.assigned_to);

    // 定向指派的学生必须真实存在
    if let FormAssignment::Students { ref student_ids } = req.assigned_to
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
                error!("Failed to verify assigned students: {}", e);
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

    match storage.create_form(created_by, req).await {
        Ok(form) => Ok(HttpResponse::Created().json(ApiResponse::success(
            FormDetailResponse {
                form,
                response_count: 0,
            },
            "表单创建成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("创建表单失败: {e}"),
            )),
        ),
    }
}
