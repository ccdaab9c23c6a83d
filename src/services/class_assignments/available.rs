use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassAssignmentService;
use crate::models::ApiResponse;
use crate::models::class_assignments::responses::AvailableClassesResponse;
use crate::services::{ensure_student_view, error_response, require_identity};

pub async fn get_available_classes(
    service: &ClassAssignmentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let identity = match require_identity(request) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_student_view(&identity, student_id) {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    match storage.get_available_classes(student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AvailableClassesResponse { student_id, items },
            "Available classes retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
