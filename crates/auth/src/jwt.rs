//! Session token validation and issuance
//!
//! Signing and parsing are delegated to `jsonwebtoken` (HS256). The
//! expired/invalid distinction is preserved so callers can react
//! differently (silent refresh vs. hard logout).

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::claims::SessionClaims;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Validate a session token and return its claims.
///
/// An expired token maps to `TokenExpired`; every other decode failure
/// maps to `InvalidToken`. The two are never collapsed.
pub(crate) fn validate_token(token: &str, config: &AuthConfig) -> Result<SessionClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry must be strictly in the future; no clock-skew grace.
    validation.leeway = 0;

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let token_data = decode::<SessionClaims>(token, &decoding_key, &validation).map_err(|e| {
        if matches!(e.kind(), ErrorKind::ExpiredSignature) {
            tracing::debug!("Session token expired");
            AuthError::TokenExpired
        } else {
            tracing::debug!(error = %e, "Session token validation failed");
            AuthError::InvalidToken
        }
    })?;

    Ok(token_data.claims)
}

/// Issue a session token for a user, valid for the configured TTL.
///
/// Consumed by the login/registration handlers and by test fixtures.
pub fn issue_token(user_id: Uuid, config: &AuthConfig) -> Result<String, AuthError> {
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = SessionClaims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + config.token_ttl_seconds,
    };

    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), &claims, &encoding_key).map_err(|e| {
        tracing::error!(error = %e, "Failed to sign session token");
        AuthError::BackendUnavailable
    })
}
