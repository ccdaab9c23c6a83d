use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use crate::models::ApiResponse;
use crate::models::enrollments::requests::{ApproveEnrollmentRequest, RejectEnrollmentRequest};
use crate::services::{error_response, require_identity};

pub async fn approve_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment_id: i64,
    body: ApproveEnrollmentRequest,
) -> ActixResult<HttpResponse> {
    let identity = match require_identity(request) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage
        .approve_enrollment_request(enrollment_id, body.class_id, body.admin_notes)
        .await
    {
        Ok(enrollment) => {
            info!(
                "Enrollment request {} approved by admin {}",
                enrollment_id, identity.user_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                enrollment,
                "Enrollment request approved",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn reject_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment_id: i64,
    body: RejectEnrollmentRequest,
) -> ActixResult<HttpResponse> {
    let identity = match require_identity(request) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage
        .reject_enrollment_request(enrollment_id, body.admin_notes)
        .await
    {
        Ok(enrollment) => {
            info!(
                "Enrollment request {} rejected by admin {}",
                enrollment_id, identity.user_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                enrollment,
                "Enrollment request rejected",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
