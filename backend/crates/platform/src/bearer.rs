//! Bearer token extraction
//!
//! Parses `Authorization: Bearer <token>` from request headers.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

const SCHEME: &str = "bearer";

/// Extract the token from an `Authorization` header
///
/// The scheme is matched case-insensitively; an empty token is treated as
/// missing.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return None;
    }

    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Raw bearer token of the current request
///
/// Only proves that a token was sent; verifying it is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = MissingBearer;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_bearer_token(&parts.headers)
            .map(|token| BearerToken(token.to_string()))
            .ok_or(MissingBearer)
    }
}

/// Rejection for a missing or malformed `Authorization` header
#[derive(Debug, Clone, Copy)]
pub struct MissingBearer;

impl IntoResponse for MissingBearer {
    fn into_response(self) -> Response {
        tracing::debug!("Request without bearer token rejected");

        let body = json!({
            "type": "about:blank",
            "title": "Unauthorized",
            "status": StatusCode::UNAUTHORIZED.as_u16(),
            "detail": "Missing or malformed bearer token",
        });

        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))],
            Json(body),
        )
            .into_response()
    }
}
