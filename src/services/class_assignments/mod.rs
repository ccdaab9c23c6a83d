pub mod assigned;
pub mod available;
pub mod remove;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::class_assignments::requests::RemoveClassesRequest;
use crate::storage::Storage;

pub struct ClassAssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassAssignmentService {
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

    // 可选班级
    pub async fn get_available_classes(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        available::get_available_classes(self, request, student_id).await
    }

    // 已分配班级
    pub async fn get_assigned_classes(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        assigned::get_assigned_classes(self, request, student_id).await
    }

    // 已分配班级数量
    pub async fn count_assigned_classes(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        assigned::count_assigned_classes(self, request, student_id).await
    }

    // 移除班级
    pub async fn remove_classes(
        &self,
        request: &HttpRequest,
        student_id: i64,
        body: RemoveClassesRequest,
    ) -> ActixResult<HttpResponse> {
        remove::remove_classes(self, request, student_id, body).await
    }
}
