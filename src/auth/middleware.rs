use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;
use std::rc::Rc;

use crate::auth::extractors::CurrentUser;
use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::store;

/// Routes reachable without a bearer token.
const PUBLIC_PATHS: &[&str] = &["/health", "/auth/register", "/auth/login", "/auth/refresh"];

/// Request authorization gateway.
///
/// For every non-public route: extract the bearer token, verify it on the
/// access-token path, re-check the claimed user still exists, and attach the
/// resolved [`CurrentUser`] to request extensions. A deleted user therefore
/// invalidates all of their outstanding tokens even without a revocation
/// store.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            if PUBLIC_PATHS.contains(&req.path()) {
                return service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body);
            }

            let authorized = async {
                let token = req
                    .headers()
                    .get("Authorization")
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.strip_prefix("Bearer "))
                    .map(str::to_owned)
                    .ok_or_else(|| AppError::Unauthorized("No token provided".into()))?;

                let tokens = req
                    .app_data::<web::Data<TokenService>>()
                    .cloned()
                    .ok_or_else(|| AppError::Internal("TokenService not configured".into()))?;
                let claims = tokens.verify_access(&token)?;

                // The token may outlive its user. Resolve the identity against the
                // credential store before letting the request through.
                let pool = req
                    .app_data::<web::Data<PgPool>>()
                    .cloned()
                    .ok_or_else(|| AppError::Internal("Database pool not configured".into()))?;
                let user = store::users::find_by_id(&pool, claims.sub)
                    .await?
                    .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

                Ok::<CurrentUser, Error>(CurrentUser {
                    id: user.id,
                    email: user.email,
                })
            }
            .await;

            match authorized {
                Ok(current_user) => {
                    req.extensions_mut().insert(current_user);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(err) => {
                    let response = err.error_response().map_into_right_body();
                    Ok(req.into_response(response))
                }
            }
        })
    }
}
