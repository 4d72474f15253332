//! Authentication errors
//!
//! A closed enumeration of failure kinds. The HTTP status and the stable
//! machine-readable code are applied only here, at the boundary;
//! downstream systems branch on the code, never the message text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error. Every variant is terminal for the current
/// request; nothing is retried internally.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No credential on either transport
    MissingCredential,
    /// Authorization header present but not `Bearer <token>`
    MalformedCredential,
    TokenExpired,
    InvalidToken,
    /// Token subject is not a valid user id
    InvalidSubject,
    /// Lookup miss and repository failure share this variant so the
    /// external code never reveals whether the identifier existed
    PrincipalNotFound,
    PrincipalInactive,
    /// Cookie-transport request failed the Origin/Referer check
    OriginRejected,
    /// Caller proved identity but lacks the admin role
    InsufficientPrivilege,
    /// Unset admin secret and mismatched key are indistinguishable
    InvalidAdminKey,
    /// Repository or settings lookup failure, reported as a generic
    /// internal error so operators can tell infra failure from a
    /// legitimate auth rejection
    BackendUnavailable,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::MalformedCredential
            | AuthError::TokenExpired
            | AuthError::InvalidToken
            | AuthError::InvalidSubject
            | AuthError::PrincipalNotFound
            | AuthError::PrincipalInactive
            | AuthError::InvalidAdminKey => StatusCode::UNAUTHORIZED,
            AuthError::OriginRejected | AuthError::InsufficientPrivilege => StatusCode::FORBIDDEN,
            AuthError::BackendUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential | AuthError::MalformedCredential => "UNAUTHORIZED",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidToken | AuthError::InvalidSubject => "INVALID_TOKEN",
            AuthError::PrincipalNotFound => "USER_NOT_FOUND",
            AuthError::PrincipalInactive => "USER_INACTIVE",
            AuthError::OriginRejected => "INVALID_ORIGIN",
            AuthError::InsufficientPrivilege => "FORBIDDEN",
            AuthError::InvalidAdminKey => "INVALID_ADMIN_KEY",
            AuthError::BackendUnavailable => "INTERNAL_ERROR",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "Authorization required",
            AuthError::MalformedCredential => {
                "Authorization header format must be 'Bearer {token}'"
            }
            AuthError::TokenExpired => "Token has expired",
            AuthError::InvalidToken => "Invalid token",
            AuthError::InvalidSubject => "Invalid user ID in token",
            AuthError::PrincipalNotFound => "User not found",
            AuthError::PrincipalInactive => "User account is not active",
            AuthError::OriginRejected => "Origin or Referer check failed",
            AuthError::InsufficientPrivilege => "Admin access required",
            AuthError::InvalidAdminKey => "Invalid admin API key",
            AuthError::BackendUnavailable => "Internal server error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = self.error_code(), "Authentication backend failure");
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.message(),
            }
        }));

        (status, body).into_response()
    }
}
