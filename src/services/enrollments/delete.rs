use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::ApiResponse;
use crate::services::{error_response, require_identity};

pub async fn delete_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment_id: i64,
) -> ActixResult<HttpResponse> {
    let identity = match require_identity(request) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage
        .delete_enrollment_request(enrollment_id, identity.user_id)
        .await
    {
        Ok(receipt) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            receipt,
            "Enrollment request deleted successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
