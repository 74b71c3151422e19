/// JWT authentication middleware
///
/// The request gate for protected scopes: extracts the bearer token from
/// the Authorization header, validates signature, issuer, audience, and
/// the validity window with zero leeway, and injects the claims into
/// request extensions for route handlers. Anything short of a fully
/// valid token ends the request with 401 before it reaches a handler.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::validate_access_token;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

pub struct JwtMiddleware {
    jwt_settings: JwtSettings,
}

impl JwtMiddleware {
    pub fn new(jwt_settings: JwtSettings) -> Self {
        Self { jwt_settings }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            jwt_settings: self.jwt_settings.clone(),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    jwt_settings: JwtSettings,
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let bearer_token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.to_string());

        let token = match bearer_token {
            Some(token) => token,
            None => {
                tracing::warn!(path = %req.path(), "Missing or malformed Authorization header");
                return Box::pin(async move {
                    Err(AppError::Auth(AuthError::MissingToken).into())
                });
            }
        };

        match validate_access_token(&token, &self.jwt_settings) {
            Ok(claims) => {
                tracing::debug!(
                    user_id = claims.id,
                    email = %claims.email,
                    "Bearer token validated"
                );
                req.extensions_mut().insert(claims);

                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(err) => {
                tracing::warn!(path = %req.path(), "Bearer token rejected: {}", err);
                Box::pin(async move { Err(err.into()) })
            }
        }
    }
}
