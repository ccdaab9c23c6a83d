use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::ApiResponse;
use crate::services::error_response;

pub async fn mark_registration_fee_paid(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.mark_registration_fee_paid(enrollment_id).await {
        Ok(enrollment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            "Registration fee marked as paid",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
