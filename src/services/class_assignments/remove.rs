use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassAssignmentService;
use crate::models::ApiResponse;
use crate::models::class_assignments::requests::RemoveClassesRequest;
use crate::services::{error_response, require_identity};

pub async fn remove_classes(
    service: &ClassAssignmentService,
    request: &HttpRequest,
    student_id: i64,
    body: RemoveClassesRequest,
) -> ActixResult<HttpResponse> {
    let identity = match require_identity(request) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let remove_all = body.class_ids.is_empty();
    match storage.remove_classes(student_id, body.class_ids).await {
        Ok(assignment) => {
            info!(
                "Admin {} removed {} classes from student {}",
                identity.user_id,
                if remove_all { "all" } else { "selected" },
                student_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                assignment,
                "Classes removed successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
