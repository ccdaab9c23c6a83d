use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use crate::models::enrollments::requests::CreateEnrollmentRequest;
use crate::models::users::entities::{Identity, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, require_identity};

pub async fn create_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    body: CreateEnrollmentRequest,
) -> ActixResult<HttpResponse> {
    let identity = match require_identity(request) {
        Ok(identity) => identity,
        Err(resp) => return Ok(resp),
    };

    let student_id = match resolve_student_id(&identity, body.student_id) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage
        .create_enrollment_request(student_id, body.course_id, body.preferred_level)
        .await
    {
        Ok(enrollment) => {
            info!(
                "Enrollment request {} created for student {} by {}",
                enrollment.id, student_id, identity.user_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                enrollment,
                "Enrollment request submitted successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

/// 确定申请归属的学生
///
/// 学生只能为自己提交（可省略 student_id），管理员必须指定学生。
fn resolve_student_id(identity: &Identity, requested: Option<i64>) -> Result<i64, HttpResponse> {
    match identity.role {
        UserRole::Student => match requested {
            Some(id) if id != identity.user_id => Err(HttpResponse::Forbidden().json(
                ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "Students can only submit enrollment requests for themselves",
                ),
            )),
            _ => Ok(identity.user_id),
        },
        UserRole::Admin => requested.ok_or_else(|| {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "student_id is required when submitting on behalf of a student",
            ))
        }),
        UserRole::Teacher => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Teachers cannot submit enrollment requests",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_defaults_to_self() {
        let identity = Identity {
            user_id: 3,
            role: UserRole::Student,
        };
        assert_eq!(resolve_student_id(&identity, None).ok(), Some(3));
        assert_eq!(resolve_student_id(&identity, Some(3)).ok(), Some(3));
        assert!(resolve_student_id(&identity, Some(4)).is_err());
    }

    #[test]
    fn test_admin_must_name_student() {
        let identity = Identity {
            user_id: 1,
            role: UserRole::Admin,
        };
        assert!(resolve_student_id(&identity, None).is_err());
        assert_eq!(resolve_student_id(&identity, Some(8)).ok(), Some(8));
    }
}
