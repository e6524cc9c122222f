//! Acting-user extractor.
//!
//! Authentication lives in the upstream gateway, which forwards the
//! verified user id in the `X-User-Id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use emberly_core::error::AppError;
use emberly_core::types::UserId;
use emberly_engine::RequestContext;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The acting user's request context, one per request.
#[derive(Debug, Clone)]
pub struct ActingUser(pub RequestContext);

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::validation("Missing X-User-Id header"))?;

        let value = header
            .to_str()
            .map_err(|_| AppError::validation("X-User-Id header is not valid UTF-8"))?;

        let user_id: UserId = value
            .parse()
            .map_err(|_| AppError::validation(format!("X-User-Id is not a UUID: '{value}'")))?;

        Ok(ActingUser(RequestContext::new(user_id)))
    }
}
