use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::forms::requests::{
    CreateFormRequest, FormListParams, StudentFormsParams, SubmitResponseRequest,
    UpdateFormRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::FormService;
use crate::utils::SafeFormIdI64;

// 懒加载的全局 FormService 实例
static FORM_SERVICE: Lazy<FormService> = Lazy::new(FormService::new_lazy);

// 列出表单（教师视角：自己创建的）
pub async fn list_forms(
    req: HttpRequest,
    query: web::Query<FormListParams>,
) -> ActixResult<HttpResponse> {
    FORM_SERVICE.list_forms(&req, query.into_inner()).await
}

// 创建表单
pub async fn create_form(
    req: HttpRequest,
    body: web::Json<CreateFormRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    FORM_SERVICE
        .create_form(&req, user_id, body.into_inner())
        .await
}

// 获取表单详情
pub async fn get_form(req: HttpRequest, path: SafeFormIdI64) -> ActixResult<HttpResponse> {
    FORM_SERVICE.get_form(&req, path.0).await
}

// 更新表单
pub async fn update_form(
    req: HttpRequest,
    path: SafeFormIdI64,
    body: web::Json<UpdateFormRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    FORM_SERVICE
        .update_form(&req, path.0, body.into_inner(), user_id)
        .await
}

// 删除表单
pub async fn delete_form(req: HttpRequest, path: SafeFormIdI64) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    FORM_SERVICE.delete_form(&req, path.0, user_id).await
}

// 学生的待办表单
pub async fn list_pending_forms(
    req: HttpRequest,
    query: web::Query<StudentFormsParams>,
) -> ActixResult<HttpResponse> {
    FORM_SERVICE
        .list_pending_forms(&req, query.into_inner())
        .await
}

// 学生已完成的表单
pub async fn list_completed_forms(
    req: HttpRequest,
    query: web::Query<StudentFormsParams>,
) -> ActixResult<HttpResponse> {
    FORM_SERVICE
        .list_completed_forms(&req, query.into_inner())
        .await
}

// 提交表单回复
pub async fn submit_response(
    req: HttpRequest,
    path: SafeFormIdI64,
    body: web::Json<SubmitResponseRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    FORM_SERVICE
        .submit_response(&req, path.0, user_id, body.into_inner())
        .await
}

// 获取表单统计
pub async fn get_form_analytics(req: HttpRequest, path: SafeFormIdI64) -> ActixResult<HttpResponse> {
    FORM_SERVICE.get_form_analytics(&req, path.0).await
}

// 导出表单回复
pub async fn export_form_responses(
    req: HttpRequest,
    path: SafeFormIdI64,
) -> ActixResult<HttpResponse> {
    FORM_SERVICE.export_form_responses(&req, path.0).await
}

// 配置路由
pub fn configure_forms_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/forms")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出表单 - 仅教师和管理员（业务层按创建者过滤）
                    .route(
                        web::get()
                            .to(list_forms)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    // 创建表单 - 仅教师和管理员
                    .route(
                        web::post()
                            .to(create_form)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            // 待办表单 - 所有登录用户可访问（业务层限制家长只能查自己监护的学生）
            .service(web::resource("/pending").route(web::get().to(list_pending_forms)))
            // 已完成表单 - 所有登录用户可访问（业务层同上）
            .service(web::resource("/completed").route(web::get().to(list_completed_forms)))
            .service(
                web::resource("/{id}")
                    // 表单详情 - 所有登录用户可访问（业务层按角色校验可见性）
                    .route(web::get().to(get_form))
                    // 更新表单 - 仅教师和管理员，且表单尚无回复
                    .route(
                        web::put()
                            .to(update_form)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    // 删除表单 - 仅教师和管理员
                    .route(
                        web::delete()
                            .to(delete_form)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/responses")
                    // 提交回复 - 仅家长，限流防止脚本刷表单
                    .wrap(middlewares::RateLimit::form_submit())
                    .route(
                        web::post()
                            .to(submit_response)
                            .wrap(middlewares::RequireRole::new_any(UserRole::parent_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/analytics")
                    // 权限在业务层检查（创建者或管理员）
                    .route(web::get().to(get_form_analytics)),
            )
            .service(
                web::resource("/{id}/analytics/export")
                    // 权限在业务层检查（创建者或管理员）
                    .route(web::get().to(export_form_responses)),
            ),
    );
}
