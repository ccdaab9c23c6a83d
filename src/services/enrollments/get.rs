use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{ensure_student_view, error_response, require_identity};

pub async fn get_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment_id: i64,
) -> ActixResult<HttpResponse> {
    let identity = match require_identity(request) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.get_enrollment_request_detail(enrollment_id).await {
        Ok(Some(detail)) => {
            if let Err(resp) = ensure_student_view(&identity, detail.request.student_id) {
                return Ok(resp);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                detail,
                "Enrollment request retrieved successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment request not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
