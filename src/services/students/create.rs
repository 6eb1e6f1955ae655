use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::CreateStudentRequest, responses::StudentResponse},
    users::entities::UserRole,
};

pub async fn create_student(
    service: &StudentService,
    student_data: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 基本字段校验
    if student_data.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "学生姓名不能为空",
        )));
    }
    if student_data.standard < 1 || student_data.division.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "无效的班级信息",
        )));
    }

    // 监护人账号必须存在且为家长角色
    if let Some(parent_id) = student_data.parent_id {
        match storage.get_user_by_id(parent_id).await {
            Ok(Some(user)) if user.role == UserRole::Parent => {}
            Ok(Some(_)) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "监护人账号必须是家长角色",
                )));
            }
            Ok(None) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::UserNotFound,
                    "监护人账号不存在",
                )));
            }
            Err(e) => {
                error!("Failed to look up parent account: {}", e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("查询监护人账号失败: {e}"),
                    )),
                );
            }
        }
    }

    match storage.create_student(student_data).await {
        Ok(student) => Ok(HttpResponse::Created().json(ApiResponse::success(
            StudentResponse { student },
            "学生创建成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::StudentCreationFailed,
                format!("创建学生失败: {e}"),
            )),
        ),
    }
}
