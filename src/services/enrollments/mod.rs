pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod registration_fee;
pub mod review;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::enrollments::requests::{
    ApproveEnrollmentRequest, CreateEnrollmentRequest, EnrollmentQueryParams,
    RejectEnrollmentRequest,
};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
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

    // 提交选课申请
    pub async fn create_enrollment(
        &self,
        request: &HttpRequest,
        body: CreateEnrollmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_enrollment(self, request, body).await
    }

    // 申请列表
    pub async fn list_enrollments(
        &self,
        request: &HttpRequest,
        query: EnrollmentQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_enrollments(self, request, query).await
    }

    // 申请详情
    pub async fn get_enrollment(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_enrollment(self, request, enrollment_id).await
    }

    // 批准申请
    pub async fn approve_enrollment(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
        body: ApproveEnrollmentRequest,
    ) -> ActixResult<HttpResponse> {
        review::approve_enrollment(self, request, enrollment_id, body).await
    }

    // 拒绝申请
    pub async fn reject_enrollment(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
        body: RejectEnrollmentRequest,
    ) -> ActixResult<HttpResponse> {
        review::reject_enrollment(self, request, enrollment_id, body).await
    }

    // 删除申请
    pub async fn delete_enrollment(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_enrollment(self, request, enrollment_id).await
    }

    // 标记注册费已缴
    pub async fn mark_registration_fee_paid(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
    ) -> ActixResult<HttpResponse> {
        registration_fee::mark_registration_fee_paid(self, request, enrollment_id).await
    }
}
