/*!
 * 角色门禁中间件
 *
 * 读取 RequireJWT 写入请求扩展的 `Identity`，调用者角色不在允许列表中时返回 403。
 * 没有 `Identity` 说明外层未挂 RequireJWT，按未认证处理返回 401。
 *
 * ```rust,ignore
 * web::scope("/api/v1/enrollments")
 *     .wrap(RequireJWT)
 *     .service(
 *         web::resource("/{enrollment_id}/approve").route(
 *             web::put()
 *                 .to(approve_enrollment)
 *                 .wrap(RequireRole::any_of(UserRole::admin_roles())),
 *         ),
 *     )
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{Identity, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Vec<UserRole>,
}

impl RequireRole {
    /// 调用者角色属于 `roles` 之一时放行
    pub fn any_of(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }
}

fn permits(allowed: &[UserRole], identity: &Identity) -> bool {
    allowed.contains(&identity.role)
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: Rc::from(self.allowed.as_slice()),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let identity = req.extensions().get::<Identity>().cloned();

            let (status, code, message) = match identity {
                Some(identity) if permits(&allowed, &identity) => {
                    return Ok(srv.call(req).await?.map_into_left_body());
                }
                Some(identity) => {
                    info!(
                        "User {} ({}) denied on {}, allowed roles: {:?}",
                        identity.user_id,
                        identity.role,
                        req.path(),
                        allowed
                    );
                    (
                        StatusCode::FORBIDDEN,
                        ErrorCode::Forbidden,
                        "Access denied.",
                    )
                }
                None => (
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    "Authentication required",
                ),
            };

            Ok(req.into_response(
                create_error_response(status, code, message).map_into_right_body(),
            ))
        })
    }
}
