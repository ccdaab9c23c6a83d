use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PaymentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, require_identity};

pub async fn refund_installment(
    service: &PaymentService,
    request: &HttpRequest,
    enrollment_id: i64,
    installment_no: i64,
) -> ActixResult<HttpResponse> {
    let identity = match require_identity(request) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };

    let Ok(installment_no) = i32::try_from(installment_no) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Installment number is out of range",
        )));
    };

    let storage = service.get_storage(request);
    match storage
        .refund_installment(enrollment_id, installment_no)
        .await
    {
        Ok(installment) => {
            info!(
                "Installment {} of request {} refunded by admin {}",
                installment_no, enrollment_id, identity.user_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                installment,
                "Installment refunded successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
