//! Credential extraction from the inbound transport
//!
//! Pulls a bearer token from the `Authorization` header or a session
//! token from the HttpOnly cookie, and reports which transport was used.
//! Pure function of the header map; no side effects.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;

use crate::error::AuthError;

/// Which transport carried the credential. Cookie-transported
/// credentials must additionally pass the origin guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Bearer,
    Cookie,
}

/// Extract the session token and its transport.
///
/// The `Authorization` header takes precedence: when present it must be
/// exactly `Bearer <token>` (single space, non-empty token) or extraction
/// fails outright — a malformed header is never silently ignored in
/// favor of a cookie.
pub fn extract_token(
    headers: &HeaderMap,
    cookie_name: &str,
) -> Result<(String, TokenSource), AuthError> {
    if let Some(header) = headers.get(AUTHORIZATION) {
        let value = header.to_str().map_err(|_| AuthError::MalformedCredential)?;
        let mut parts = value.splitn(2, ' ');
        let scheme = parts.next().unwrap_or("");
        let token = parts.next().ok_or(AuthError::MalformedCredential)?;
        if scheme != "Bearer" {
            return Err(AuthError::MalformedCredential);
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MalformedCredential);
        }
        return Ok((token.to_string(), TokenSource::Bearer));
    }

    match session_cookie_value(headers, cookie_name) {
        Some(token) if !token.is_empty() => Ok((token, TokenSource::Cookie)),
        _ => Err(AuthError::MissingCredential),
    }
}

fn session_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                continue;
            };
            if key.trim() == cookie_name {
                return Some(val.trim().to_string());
            }
        }
    }
    None
}
