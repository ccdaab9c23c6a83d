pub mod class_assignments;
pub mod enrollments;
pub mod payments;

pub use class_assignments::ClassAssignmentService;
pub use enrollments::EnrollmentService;
pub use payments::PaymentService;

use actix_web::HttpResponse;
use tracing::{error, warn};

use crate::errors::EnrollmentError;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::Identity;
use crate::models::{ApiResponse, ErrorCode};

/// 将业务错误转换为统一的 HTTP 响应
///
/// 服务端错误只记录日志，不向调用方暴露内部细节。
pub(crate) fn error_response(err: &EnrollmentError) -> HttpResponse {
    if err.is_client_error() {
        warn!("Request rejected: {}", err);
        HttpResponse::build(err.status_code())
            .json(ApiResponse::error_empty(err.api_code(), err.message()))
    } else {
        #[cfg(debug_assertions)]
        error!("{}", err.format_colored());
        #[cfg(not(debug_assertions))]
        error!("{}", err.format_simple());

        HttpResponse::build(err.status_code()).json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            "Internal server error",
        ))
    }
}

/// 获取调用者身份，缺失时返回 401 响应
pub(crate) fn require_identity(request: &actix_web::HttpRequest) -> Result<Identity, HttpResponse> {
    RequireJWT::extract_identity(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing identity",
        ))
    })
}

/// 读取权限：学生只能查看自己的数据
pub(crate) fn ensure_student_view(identity: &Identity, student_id: i64) -> Result<(), HttpResponse> {
    if identity.can_view_student(student_id) {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You can only access your own enrollment data",
        )))
    }
}

/// 写入权限：学生只能操作自己的数据，管理员不受限制
pub(crate) fn ensure_student_access(
    identity: &Identity,
    student_id: i64,
) -> Result<(), HttpResponse> {
    if identity.can_access_student(student_id) {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You can only access your own enrollment data",
        )))
    }
}
