use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
};
use tracing::warn;

use super::{claims::Claims, jwt::JwtKeys};
use crate::error::AppError;

pub const NO_TOKEN: &str = "No token provided. Authorization denied.";
pub const INVALID_TOKEN: &str = "Invalid or expired token. Authorization denied.";

/// Verified claims of the caller. Rejects with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let claims = authenticate(parts.headers.get(AUTHORIZATION), &keys)?;
        parts.extensions.insert(claims.clone());
        Ok(AuthUser(claims))
    }
}

/// Expects exactly `Bearer <token>`; every request is verified from scratch.
pub fn authenticate(header: Option<&HeaderValue>, keys: &JwtKeys) -> Result<Claims, AppError> {
    let token = header
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            warn!("missing or malformed Authorization header");
            AppError::Unauthorized(NO_TOKEN.into())
        })?;

    keys.verify(token).ok_or_else(|| {
        warn!("invalid or expired token");
        AppError::Unauthorized(INVALID_TOKEN.into())
    })
}
