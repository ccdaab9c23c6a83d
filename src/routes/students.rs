use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::class_assignments::requests::RemoveClassesRequest;
use crate::models::users::entities::UserRole;
use crate::services::ClassAssignmentService;
use crate::utils::SafeStudentIdI64;

// 懒加载的全局 CLASS_ASSIGNMENT_SERVICE 实例
static CLASS_ASSIGNMENT_SERVICE: Lazy<ClassAssignmentService> =
    Lazy::new(ClassAssignmentService::new_lazy);

// HTTP处理程序
pub async fn get_available_classes(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_ASSIGNMENT_SERVICE
        .get_available_classes(&req, student_id.0)
        .await
}

pub async fn get_assigned_classes(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_ASSIGNMENT_SERVICE
        .get_assigned_classes(&req, student_id.0)
        .await
}

pub async fn count_assigned_classes(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_ASSIGNMENT_SERVICE
        .count_assigned_classes(&req, student_id.0)
        .await
}

pub async fn remove_classes(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    body: Option<web::Json<RemoveClassesRequest>>,
) -> ActixResult<HttpResponse> {
    // 无请求体时移除全部班级
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    CLASS_ASSIGNMENT_SERVICE
        .remove_classes(&req, student_id.0, body)
        .await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students/{student_id}")
            .wrap(middlewares::RateLimit::api())
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/available-classes").route(web::get().to(get_available_classes)),
            )
            .service(
                web::resource("/assigned-classes")
                    .route(web::get().to(get_assigned_classes))
                    .route(
                        web::delete()
                            .to(remove_classes)
                            .wrap(middlewares::RequireRole::any_of(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/assigned-classes/count")
                    .route(web::get().to(count_assigned_classes)),
            ),
    );
}
