use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, students::responses::StudentResponse, users::entities::UserRole,
};

pub async fn get_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student = match storage.get_student_by_id(student_id).await {
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

    // 家长只能查看自己监护的学生
    if let Some(user) = RequireJWT::extract_user_claims(request)
        && user.role == UserRole::Parent
        && student.parent_id != Some(user.id)
    {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只能查看自己监护的学生",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(StudentResponse { student }, "查询成功")))
}
