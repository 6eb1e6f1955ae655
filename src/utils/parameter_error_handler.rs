//! 请求参数错误处理器
//!
//! 替换 actix-web 默认的纯文本错误响应，让 JSON/查询参数反序列化
//! 失败也走统一的 ApiResponse 格式。

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

/// JSON 请求体解析错误处理器
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    let message = match &err {
        JsonPayloadError::ContentType => "请求 Content-Type 必须为 application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("请求体解析失败: {e}"),
        JsonPayloadError::OverflowKnownLength { length, limit } => {
            format!("请求体过大: {length} > {limit}")
        }
        other => format!("请求体错误: {other}"),
    };

    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    actix_web::error::InternalError::from_response(err, response).into()
}

/// 查询参数解析错误处理器
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    let message = match &err {
        QueryPayloadError::Deserialize(e) => format!("查询参数解析失败: {e}"),
        other => format!("查询参数错误: {other}"),
    };

    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    actix_web::error::InternalError::from_response(err, response).into()
}
