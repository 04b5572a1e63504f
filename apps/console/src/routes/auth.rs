use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::errors::AppError;
use crate::workflow::SessionToken;

/// Bearer token pulled from `Authorization`. Only proves the header is well
/// formed; the workflow checks it against the live session.
pub struct AdminSession(pub SessionToken);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("missing Authorization header".to_string()))?;

        let value = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("invalid Authorization header value".to_string()))?;

        let token = value
            .strip_prefix("Bearer ")
            .and_then(SessionToken::parse)
            .ok_or_else(|| AppError::Unauthorized("expected 'Bearer <session token>'".to_string()))?;

        Ok(AdminSession(token))
    }
}
