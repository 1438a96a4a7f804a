use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Raw token taken from the Authorization header. The client contract
/// sends the bare token string; a `Bearer ` prefix is tolerated and
/// stripped. A missing or empty header is a Forbidden rejection.
pub struct RawToken(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RawToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Forbidden)?;

        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))
            .unwrap_or(value);

        if token.is_empty() {
            return Err(AppError::Forbidden);
        }
        Ok(RawToken(token.to_string()))
    }
}
