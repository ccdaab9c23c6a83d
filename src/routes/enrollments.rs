use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{
    ApproveEnrollmentRequest, CreateEnrollmentRequest, EnrollmentQueryParams,
    RejectEnrollmentRequest,
};
use crate::models::payments::requests::RecordPaymentRequest;
use crate::models::users::entities::UserRole;
use crate::services::{EnrollmentService, PaymentService};
use crate::utils::{SafeEnrollmentIdI64, SafeInstallmentNoI64};

// 懒加载的全局服务实例
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);
static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);

// HTTP处理程序
pub async fn create_enrollment(
    req: HttpRequest,
    body: web::Json<CreateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_enrollment(&req, body.into_inner())
        .await
}

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentQueryParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_enrollments(&req, query.into_inner())
        .await
}

pub async fn get_enrollment(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .get_enrollment(&req, enrollment_id.0)
        .await
}

pub async fn approve_enrollment(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
    body: web::Json<ApproveEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .approve_enrollment(&req, enrollment_id.0, body.into_inner())
        .await
}

pub async fn reject_enrollment(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
    body: Option<web::Json<RejectEnrollmentRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    ENROLLMENT_SERVICE
        .reject_enrollment(&req, enrollment_id.0, body)
        .await
}

pub async fn delete_enrollment(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .delete_enrollment(&req, enrollment_id.0)
        .await
}

pub async fn mark_registration_fee_paid(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .mark_registration_fee_paid(&req, enrollment_id.0)
        .await
}

pub async fn list_installments(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .list_installments(&req, enrollment_id.0)
        .await
}

pub async fn record_payment(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
    body: Option<web::Json<RecordPaymentRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    PAYMENT_SERVICE
        .record_payment(&req, enrollment_id.0, body)
        .await
}

pub async fn refund_installment(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
    installment_no: SafeInstallmentNoI64,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .refund_installment(&req, enrollment_id.0, installment_no.0)
        .await
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                // 学生只能看到自己的申请，管理员和教师可查看全部
                web::resource("").route(web::get().to(list_enrollments)).route(
                    web::post()
                        .to(create_enrollment)
                        .wrap(middlewares::RateLimit::enrollment_create())
                        .wrap(middlewares::RequireRole::any_of(
                            UserRole::enrollment_creator_roles(),
                        )),
                ),
            )
            .service(
                web::resource("/{enrollment_id}")
                    .route(web::get().to(get_enrollment))
                    .route(
                        web::delete()
                            .to(delete_enrollment)
                            .wrap(middlewares::RequireRole::any_of(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{enrollment_id}/approve").route(
                    web::put()
                        .to(approve_enrollment)
                        .wrap(middlewares::RequireRole::any_of(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{enrollment_id}/reject").route(
                    web::put()
                        .to(reject_enrollment)
                        .wrap(middlewares::RequireRole::any_of(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{enrollment_id}/registration-fee").route(
                    web::put()
                        .to(mark_registration_fee_paid)
                        .wrap(middlewares::RequireRole::any_of(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{enrollment_id}/installments")
                    .route(web::get().to(list_installments)),
            )
            .service(
                // 学生为自己的申请付款，管理员代为登记
                web::resource("/{enrollment_id}/payments").route(web::post().to(record_payment)),
            )
            .service(
                web::resource("/{enrollment_id}/installments/{installment_no}/refund").route(
                    web::put()
                        .to(refund_installment)
                        .wrap(middlewares::RequireRole::any_of(UserRole::admin_roles())),
                ),
            ),
    );
}
