use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FormService;
use crate::middlewares::RequireJWT;
use crate::models::forms::requests::{FormListParams, FormListQuery};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_forms(
    service: &FormService,
    request: &HttpRequest,
    params: FormListParams,
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

    // 教师只能看到自己创建的表单，管理员可以看到全部
    let created_by = match user.role {
        UserRole::Admin => None,
        _ => Some(user.id),
    };

    let query = FormListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        created_by,
        search: params.search,
    };

    match storage.list_forms_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询表单列表失败: {e}"),
            )),
        ),
    }
}
