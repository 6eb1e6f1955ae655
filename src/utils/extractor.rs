//! 路径参数安全提取器
//!
//! 将路径中的 `{id}` 解析为正整数，解析失败时直接返回统一格式的
//! 400 响应，避免在每个处理函数里重复校验。

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

macro_rules! declare_safe_id_extractor {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                    let raw = req.match_info().get("id").unwrap_or_default();
                    match raw.parse::<i64>() {
                        Ok(id) if id > 0 => ready(Ok($name(id))),
                        _ => {
                            let response = HttpResponse::BadRequest().json(
                                ApiResponse::error_empty(
                                    ErrorCode::BadRequest,
                                    format!("无效的 ID: '{raw}'"),
                                ),
                            );
                            ready(Err(actix_web::error::InternalError::from_response(
                                "invalid id",
                                response,
                            )
                            .into()))
                        }
                    }
                }
            }
        )*
    };
}

declare_safe_id_extractor!(SafeIDI64, SafeFormIdI64, SafeStudentIdI64);
