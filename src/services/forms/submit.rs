use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{FormService, roster};
use crate::errors::FormSystemError;
use crate::middlewares::RequireJWT;
use crate::models::forms::entities::validate_answers;
use crate::models::forms::requests::SubmitResponseRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 提交表单回复
///
/// 校验顺序：表单存在 → 学生存在且由提交人监护 → 学生在应答名单中
/// → 尚未提交过 → 答案按字段定义逐项校验（收集全部错误）→ 入库。
/// 入库时 (form_id, student_id) 唯一索引兜底并发重复提交。
pub async fn submit_response(
    service: &FormService,
    request: &HttpRequest,
    form_id: i64,
    submitter_id: i64,
    req: SubmitResponseRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user_role = RequireJWT::extract_user_role(request);

    // 获取表单
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

    // 获取学生
    let student = match storage.get_student_by_id(req.student_id).await {
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

    // 家长只能替自己监护的学生提交
    if user_role == Some(UserRole::Parent) && student.parent_id != Some(submitter_id) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::NotStudentGuardian,
            "只能替自己监护的学生提交",
        )));
    }

    // 学生必须在表单当前的应答名单中
    match roster::roster_contains(&storage, &form, student.id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::NotInRoster,
                "该学生不在此表单的应答名单中",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("解析应答名单失败: {e}"),
                )),
            );
        }
    }

    // 重复提交检查（并发竞争由存储层唯一索引兜底）
    match storage
        .get_response_by_form_and_student(form.id, student.id)
        .await
    {
        Ok(None) => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::DuplicateSubmission,
                "该学生已提交过此表单",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询表单回复失败: {e}"),
                )),
            );
        }
    }

    // 按字段定义校验答案，一次性返回全部字段错误
    let normalized = match validate_answers(&form.fields, &req.answers) {
        Ok(answers) => answers,
        Err(field_errors) => {
            return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error(
                ErrorCode::AnswerValidationFailed,
                field_errors,
                "答案校验未通过",
            )));
        }
    };

    match storage
        .create_form_response(form.id, student.id, submitter_id, &normalized)
        .await
    {
        Ok(response) => {
            info!(
                "Response recorded for form {} student {} by parent {}",
                form.id, student.id, submitter_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(response, "提交成功")))
        }
        // 并发重复提交在这里被唯一索引拦下
        Err(FormSystemError::DuplicateSubmission(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::DuplicateSubmission, msg))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("保存表单回复失败: {e}"),
            )),
        ),
    }
}
