//! Session tokens and the middleware that turns a bearer token back into a
//! [`Session`] value. The middleware only annotates the request; handlers
//! that require authentication take `Session` as an extractor, which fails
//! with 401 when no valid token was presented.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::errors::ApiError;
use crate::models::Session;

pub mod jwt {
    use chrono::Utc;
    use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

    use crate::dto::Claims;
    use crate::errors::ApiError;
    use crate::models::Session;

    pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

    pub fn issue(secret: &str, session: &Session) -> Result<String, ApiError> {
        let exp = (Utc::now().timestamp() + SESSION_TTL_SECS) as usize;
        let claims = Claims::new(session, exp);
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|_| ApiError::Internal)
    }

    pub fn verify(secret: &str, token: &str) -> Result<Session, ApiError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| ApiError::Unauthorized)?;
        Ok(Session {
            id: data.claims.sub,
            name: data.claims.name,
            email: data.claims.email,
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get("Authorization")?;
    let value = header.to_str().ok()?;
    value.strip_prefix("Bearer ").map(|token| token.to_string())
}

pub struct AuthMiddleware {
    pub secret: String,
}

impl AuthMiddleware {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            secret: self.secret.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    secret: String,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // An invalid token is treated the same as an absent one: the
        // request proceeds unauthenticated and protected extractors reject.
        if let Some(token) = bearer_token(&req) {
            if let Ok(session) = jwt::verify(&self.secret, &token) {
                req.extensions_mut().insert(session);
            }
        }
        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req.extensions().get::<Session>().cloned();
        ready(session.ok_or_else(|| ApiError::Unauthorized.into()))
    }
}
