use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::ApiResponse;
use crate::models::enrollments::requests::{EnrollmentListQuery, EnrollmentQueryParams};
use crate::models::users::entities::UserRole;
use crate::services::{error_response, require_identity};

pub async fn list_enrollments(
    service: &EnrollmentService,
    request: &HttpRequest,
    query: EnrollmentQueryParams,
) -> ActixResult<HttpResponse> {
    let identity = match require_identity(request) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 学生只能看到自己的申请
    let student_id = match identity.role {
        UserRole::Student => Some(identity.user_id),
        _ => query.student_id,
    };

    let list_query = EnrollmentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        status: query.status,
        student_id,
        course_id: query.course_id,
    };

    match storage
        .list_enrollment_requests_with_pagination(list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Enrollment requests retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
