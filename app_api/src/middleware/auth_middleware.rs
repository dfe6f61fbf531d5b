use actix_service::{Service, Transform};
use actix_web::{
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    web, Error, HttpMessage, ResponseError,
};
use biz_service::manager::user_manager_auth::{UserManagerAuth, UserManagerAuthOpt};
use common::errors::AppError;
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

/// Paths reachable without a session.
const PUBLIC_PREFIXES: [&str; 3] = ["/status", "/auth/", "/openapi.json"];

/// Resolves the bearer token to an `AuthUser` and stores it in the request
/// extensions. Requests without a valid session get a 401 JSON body.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService { service: Rc::new(service) })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        if is_public(req.path()) {
            return Box::pin(async move {
                let res = srv.call(req).await?;
                Ok(res.map_into_left_body())
            });
        }

        let token = bearer_token(&req);
        let auth = req.app_data::<web::Data<UserManagerAuth>>().cloned();
        Box::pin(async move {
            let outcome = match (auth, token) {
                (None, _) => Err(AppError::Internal("UserManagerAuth is not registered".to_string())),
                (Some(_), None) => Err(AppError::Unauthorized("missing bearer token".to_string())),
                (Some(auth), Some(token)) => auth.authenticate(&token).await,
            };
            match outcome {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(e) => Ok(req.into_response(e.error_response().map_into_right_body())),
            }
        })
    }
}

fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token.to_string()) }
}
