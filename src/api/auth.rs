//! Caller identity extraction.
//!
//! JWT verification happens upstream at the gateway; by the time a request
//! reaches this service the subject has been placed in the `x-user-id`
//! header. This is the narrow interface to the external identity provider.

use crate::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the verified subject of the caller.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller's user id.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match user_id {
            Some(id) => Ok(AuthUser(id.to_string())),
            None => Err(ApiError::unauthorized()),
        }
    }
}
