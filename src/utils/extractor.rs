//! 安全的路径参数提取器
//!
//! 路径中的 ID 必须是正整数，否则直接返回 400 与统一的错误响应体。

use actix_web::{HttpRequest, HttpResponse, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

pub(crate) fn parse_positive_i64(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_request(format!("Missing path parameter: {name}")))?;

    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(bad_request(format!(
            "Invalid path parameter {name}: expected a positive integer"
        ))),
    }
}

macro_rules! define_safe_i64_extractor {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name(pub i64);

            impl actix_web::FromRequest for $name {
                type Error = actix_web::Error;
                type Future = std::future::Ready<Result<Self, Self::Error>>;

                fn from_request(
                    req: &actix_web::HttpRequest,
                    _payload: &mut actix_web::dev::Payload,
                ) -> Self::Future {
                    std::future::ready(parse_positive_i64(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_i64_extractor! {
    SafeEnrollmentIdI64 => "enrollment_id",
    SafeStudentIdI64 => "student_id",
    SafeInstallmentNoI64 => "installment_no",
}
