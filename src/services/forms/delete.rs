use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FormService;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_form(
    service: &FormService,
    request: &HttpRequest,
    form_id: i64,
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

    // 权限检查：只有表单创建者或管理员才能删除
    match user_role {
        Some(UserRole::Admin) => {} // 管理员可以删除任何表单
        Some(UserRole::Teacher) => {
            if form.created_by != user_id {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "只能删除自己创建的表单",
                )));
            }
        }
        _ => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "没有删除表单的权限",
            )));
        }
    }

    // 删除表单会级联删除全部回复和指派记录
    match storage.delete_form(form_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("表单已删除"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FormNotFound,
            "表单不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FormDeleteFailed,
                format!("删除表单失败: {e}"),
            )),
        ),
    }
}
