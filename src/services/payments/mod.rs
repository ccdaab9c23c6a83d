pub mod list;
pub mod record;
pub mod refund;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::enrollments::entities::EnrollmentRequest;
use crate::models::payments::requests::RecordPaymentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

use super::error_response;

pub struct PaymentService {
    storage: Option<Arc<dyn Storage>>,
}

impl PaymentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 分期列表
    pub async fn list_installments(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_installments(self, request, enrollment_id).await
    }

    // 记录付款
    pub async fn record_payment(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
        body: RecordPaymentRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_payment(self, request, enrollment_id, body).await
    }

    // 退款
    pub async fn refund_installment(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
        installment_no: i64,
    ) -> ActixResult<HttpResponse> {
        refund::refund_installment(self, request, enrollment_id, installment_no).await
    }
}

/// 读取申请用于归属校验，不存在时返回 404 响应
async fn load_request(
    storage: &Arc<dyn Storage>,
    enrollment_id: i64,
) -> Result<EnrollmentRequest, HttpResponse> {
    match storage.get_enrollment_request_by_id(enrollment_id).await {
        Ok(Some(request)) => Ok(request),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment request not found",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}
