use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{PaymentService, load_request};
use crate::models::ApiResponse;
use crate::models::payments::requests::RecordPaymentRequest;
use crate::services::{ensure_student_access, error_response, require_identity};

pub async fn record_payment(
    service: &PaymentService,
    request: &HttpRequest,
    enrollment_id: i64,
    body: RecordPaymentRequest,
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
    if let Err(resp) = ensure_student_access(&identity, enrollment.student_id) {
        return Ok(resp);
    }

    match storage
        .record_payment(enrollment_id, body.installment_no)
        .await
    {
        Ok(installment) => {
            info!(
                "Payment recorded for request {} installment {} by user {}",
                enrollment_id, installment.installment_no, identity.user_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                installment,
                "Payment recorded successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
