//! Session cookie handling and the current-user extractor.
//!
//! The login handler stores the signed token in an HTTP-only
//! `access_token` cookie. Every authenticated route resolves that cookie
//! through [`CurrentUser`], which never rejects a request by itself:
//! handlers decide whether an absent user is a 401.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use cryptid_types::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "access_token";

/// Extract the session token from the request's `Cookie` headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.trim_matches('"').to_owned())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value that stores `token` as an HTTP-only cookie.
pub fn token_cookie(token: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&format!(
        "{TOKEN_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax"
    ))
    .map_err(|e| ApiError::Internal(format!("invalid cookie value: {e}")))
}

/// `Set-Cookie` value that clears the session cookie.
pub fn clear_token_cookie() -> HeaderValue {
    HeaderValue::from_static(
        "access_token=\"\"; expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Path=/; SameSite=Lax",
    )
}

/// The user resolved from the session cookie, if any.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    /// The resolved user, or [`ApiError::Unauthorized`].
    pub fn require(self) -> Result<User, ApiError> {
        self.0.ok_or(ApiError::Unauthorized)
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers);
        Ok(Self(state.users.current_user(token.as_deref()).await))
    }
}
