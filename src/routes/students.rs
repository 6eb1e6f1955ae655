use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::students::requests::{
    CreateStudentRequest, StudentListParams, UpdateStudentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::StudentService;
use crate::utils::SafeStudentIdI64;

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

// 列出学生
pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(query.into_inner(), &req).await
}

// 创建学生
pub async fn create_student(
    req: HttpRequest,
    student_data: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_student(student_data.into_inner(), &req)
        .await
}

// 获取学生详情
pub async fn get_student(req: HttpRequest, path: SafeStudentIdI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(path.0, &req).await
}

// 更新学生
pub async fn update_student(
    req: HttpRequest,
    path: SafeStudentIdI64,
    update_data: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(path.0, update_data.into_inner(), &req)
        .await
}

// 删除学生
pub async fn delete_student(req: HttpRequest, path: SafeStudentIdI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(path.0, &req).await
}

// 配置路由
pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 花名册列表 - 仅教师和管理员
                    .route(
                        web::get()
                            .to(list_students)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    // 创建学生 - 仅教师和管理员
                    .route(
                        web::post()
                            .to(create_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    // 学生详情 - 所有登录用户可访问（业务层限制家长只能看自己监护的学生）
                    .route(web::get().to(get_student))
                    // 更新学生 - 仅教师和管理员
                    .route(
                        web::put()
                            .to(update_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    // 删除学生 - 仅管理员
                    .route(
                        web::delete()
                            .to(delete_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
