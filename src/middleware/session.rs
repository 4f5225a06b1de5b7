//! Orchestrator session middleware
//!
//! The dashboard keeps no credentials of its own: every request carries the
//! caller's tsuru token, which is forwarded untouched to each upstream call.

use axum::{
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use crate::services::tsuru::SessionToken;
use crate::utils::error::AppError;

/// Cookie holding the token when the browser cannot set a header
pub const TOKEN_COOKIE: &str = "tsuru_token";

/// Pull the token from the `Authorization` header or the session cookie
pub fn extract_token(headers: &HeaderMap) -> Option<SessionToken> {
    let from_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|t| !t.trim().is_empty())
        .map(SessionToken::new);

    from_header.or_else(|| {
        CookieJar::from_headers(headers)
            .get(TOKEN_COOKIE)
            .map(|c| c.value().trim().to_string())
            .filter(|t| !t.is_empty())
            .map(SessionToken::new)
    })
}

/// Reject requests without a token and store it for the handlers
pub async fn session_middleware(mut request: Request, next: Next) -> Result<Response, AppError> {
    let Some(token) = extract_token(request.headers()) else {
        debug!(path = %request.uri().path(), "Request without orchestrator token");
        return Err(AppError::Unauthorized("Authentication required".to_string()));
    };

    request.extensions_mut().insert(token);
    Ok(next.run(request).await)
}

/// Extractor for the session token after [`session_middleware`] has run
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionToken>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
