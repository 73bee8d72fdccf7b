//! 路径参数安全提取器
//!
//! 将 `/{id}` 形式的路径参数解析为 i64，解析失败时返回统一的 400 响应，
//! 避免在各个处理函数里重复做字符串转换和错误包装。

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 定义路径 ID 提取器的宏：每个提取器绑定一个具体的路径参数名
macro_rules! define_id_extractors {
    ($(
        $name:ident($param:literal, $label:literal)
    ),* $(,)?) => {
        $(
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                    let parsed = req
                        .match_info()
                        .get($param)
                        .and_then(|raw| raw.parse::<i64>().ok())
                        .filter(|id| *id > 0);

                    ready(match parsed {
                        Some(id) => Ok($name(id)),
                        None => Err(actix_web::error::InternalError::from_response(
                            concat!("invalid ", $label, " id"),
                            actix_web::HttpResponse::BadRequest().json(
                                ApiResponse::error_empty(
                                    ErrorCode::BadRequest,
                                    concat!("Invalid ", $label, " id in path"),
                                ),
                            ),
                        )
                        .into()),
                    })
                }
            }
        )*
    };
}

define_id_extractors! {
    SafeIdI64("id", "resource"),
    SafeSessionIdI64("session_id", "session"),
    SafeEnrollmentIdI64("enrollment_id", "enrollment"),
    SafeAssignmentIdI64("assignment_id", "assignment"),
}
