use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PaymentService, load_request};
use crate::models::ApiResponse;
use crate::models::payments::responses::InstallmentListResponse;
use crate::services::{ensure_student_view, error_response, require_identity};

pub async fn list_installments(
    service: &PaymentService,
    request: &HttpRequest,
    enrollment_id: i64,
) -> ActixResult<HttpResponse> {
    let identity = match require_identity(request) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let enrollment = match load_request(&storage, enrollment_id).await {
        Ok(enrollment) => enrollment,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_student_view(&identity, enrollment.student_id) {
        return Ok(resp);
    }

    match storage.list_installments(enrollment_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            InstallmentListResponse::new(enrollment_id, items),
            "Installments retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
