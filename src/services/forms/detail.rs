use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FormService, roster};
use crate::middlewares::RequireJWT;
use crate::models::forms::responses::FormDetailResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_form(
    service: &FormService,
    request: &HttpRequest,
    form_id: i64,
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

    // 访问控制：
    // - 管理员可查看任何表单
    // - 教师只能查看自己创建的表单
    // - 家长需要名下至少一名学生在该表单的应答名单中（用于填写时渲染）
    match user.role {
        UserRole::Admin => {}
        UserRole::Teacher => {
            if form.created_by != user.id {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "只能查看自己创建的表单",
                )));
            }
        }
        UserRole::Parent => {
            let students = match storage.list_students_by_parent(user.id).await {
                Ok(s) => s,
                Err(e) => {
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("查询监护学生失败: {e}"),
                        ),
                    ));
                }
            };

            let mut covered = false;
            for student in &students {
                match roster::roster_contains(&storage, &form, student.id).await {
                    Ok(true) => {
                        covered = true;
                        break;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        return Ok(HttpResponse::InternalServerError().json(
                            ApiResponse::error_empty(
                                ErrorCode::InternalServerError,
                                format!("解析应答名单失败: {e}"),
                            ),
                        ));
                    }
                }
            }

            if !covered {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "该表单未指派给您监护的学生",
                )));
            }
        }
    }

    let response_count = match storage.count_responses_for_form(form_id).await {
        Ok(count) => count,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("统计表单回复失败: {e}"),
                )),
            );
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        FormDetailResponse {
            form,
            response_count,
        },
        "查询成功",
    )))
}
