//! Axum extractors for the authentication gates
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>` — axum's
//! idiomatic nested-state pattern. The extractor result is the
//! request-scoped identity; handlers receive it as a typed argument
//! instead of fishing values out of a context bag.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;

/// Header carrying the static admin key.
pub const ADMIN_API_KEY_HEADER: &str = "x-api-key";

/// Authenticated user extractor (bearer token or session cookie).
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);
        let context = backend.authenticate_user(parts).await?;
        Ok(AuthUser(context))
    }
}

/// Admin gate extractor.
///
/// Tries the static admin key first, else falls back to the full user
/// gate plus a role check. The mere presence of the admin-key header
/// commits to that path — a wrong key never falls back to cookie or
/// bearer auth.
#[derive(Debug)]
pub struct AdminUser(pub AuthContext);

impl<S> FromRequestParts<S> for AdminUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);

        if let Some(header) = parts.headers.get(ADMIN_API_KEY_HEADER) {
            let supplied = header.to_str().map_err(|_| AuthError::InvalidAdminKey)?;
            if !supplied.is_empty() {
                let context = backend.authenticate_admin_key(supplied).await?;
                return Ok(AdminUser(context));
            }
        }

        let AuthUser(context) = AuthUser::from_request_parts(parts, state).await?;
        if !context.is_admin() {
            // The caller proved identity but lacks privilege: 403, not 401.
            return Err(AuthError::InsufficientPrivilege);
        }
        Ok(AdminUser(context))
    }
}
