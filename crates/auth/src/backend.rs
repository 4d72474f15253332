//! Concrete authentication backend
//!
//! Wraps the load-time-validated `AuthConfig` plus the injected
//! capability interfaces, and owns the gate state machines. Immutable
//! after construction; clones share the underlying configuration and
//! capabilities, so it is safely used across concurrent requests
//! without locking.

use std::sync::Arc;

use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::uri::Scheme;
use uuid::Uuid;

use relaygate_common::crypto::constant_time_eq;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::extract::{extract_token, TokenSource};
use crate::origin;
use crate::repo::{AdminSecretProvider, UserLookup};
use crate::types::{AuthMethod, AuthUserRecord, Identity};

#[derive(Clone)]
pub struct AuthBackend {
    config: Arc<AuthConfig>,
    users: Arc<dyn UserLookup>,
    settings: Arc<dyn AdminSecretProvider>,
}

impl AuthBackend {
    pub fn new(
        config: AuthConfig,
        users: Arc<dyn UserLookup>,
        settings: Arc<dyn AdminSecretProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            users,
            settings,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// User gate: extract -> origin check (cookie transport only) ->
    /// validate claims -> load user -> active check.
    pub(crate) async fn authenticate_user(&self, parts: &Parts) -> Result<AuthContext, AuthError> {
        let (token, source) = extract_token(&parts.headers, &self.config.cookie_name)?;

        // Cookie credentials are attached by the browser without client
        // intent, so they must pass the origin check before the token
        // is even validated. Bearer requests are exempt.
        if source == TokenSource::Cookie {
            self.enforce_cookie_origin(parts)?;
        }

        self.authenticate_token(&token, source).await
    }

    pub(crate) fn enforce_cookie_origin(&self, parts: &Parts) -> Result<(), AuthError> {
        let allowed = origin::enforce_cookie_origin(
            &parts.method,
            &parts.headers,
            request_tls(parts),
            &request_host(parts),
            &self.config.allowed_origins,
            self.config.cookie_policy.require_origin,
        );
        if !allowed {
            return Err(AuthError::OriginRejected);
        }
        Ok(())
    }

    /// Validate a session token and resolve its principal.
    pub(crate) async fn authenticate_token(
        &self,
        token: &str,
        source: TokenSource,
    ) -> Result<AuthContext, AuthError> {
        let claims = crate::jwt::validate_token(token, &self.config)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidSubject)?;

        let user = self.load_user(user_id).await?;
        if !user.status.is_active() {
            return Err(AuthError::PrincipalInactive);
        }

        let method = match source {
            TokenSource::Cookie => AuthMethod::Cookie,
            TokenSource::Bearer => AuthMethod::Jwt,
        };
        Ok(AuthContext::new(Identity::from_record(&user), method))
    }

    /// Admin-key gate: constant-time comparison against the configured
    /// secret, then identity resolution via the first admin account —
    /// the key authenticates as the platform's admin, not as any
    /// caller-claimed user.
    pub(crate) async fn authenticate_admin_key(
        &self,
        supplied: &str,
    ) -> Result<AuthContext, AuthError> {
        let stored = self.settings.admin_api_key().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to load admin API key setting");
            AuthError::BackendUnavailable
        })?;

        // Unset secret and mismatch yield the same error so a caller
        // cannot learn whether admin-key auth is configured at all.
        let matches = match stored.as_deref() {
            Some(secret) if !secret.is_empty() => {
                constant_time_eq(supplied.as_bytes(), secret.as_bytes())
            }
            _ => false,
        };
        if !matches {
            return Err(AuthError::InvalidAdminKey);
        }

        let admin = match self.users.get_first_admin().await {
            Ok(Some(admin)) => admin,
            Ok(None) => {
                tracing::error!("Admin key accepted but no admin account exists");
                return Err(AuthError::BackendUnavailable);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load admin account");
                return Err(AuthError::BackendUnavailable);
            }
        };

        tracing::info!(user_id = %admin.id, auth_method = %AuthMethod::AdminApiKey, "Admin key authentication");
        Ok(AuthContext::new(
            Identity::from_record(&admin),
            AuthMethod::AdminApiKey,
        ))
    }

    /// A lookup miss and a repository failure surface identically; the
    /// external code never reveals whether the identifier existed.
    async fn load_user(&self, user_id: Uuid) -> Result<AuthUserRecord, AuthError> {
        match self.users.get_by_id(user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(AuthError::PrincipalNotFound),
            Err(e) => {
                tracing::error!(error = %e, user_id = %user_id, "Failed to load user");
                Err(AuthError::PrincipalNotFound)
            }
        }
    }
}

/// Direct-TLS signal; behind a proxy the `X-Forwarded-Proto` header is
/// consulted where the scheme matters.
fn request_tls(parts: &Parts) -> bool {
    parts.uri.scheme() == Some(&Scheme::HTTPS)
}

fn request_host(parts: &Parts) -> String {
    if let Some(authority) = parts.uri.authority() {
        return authority.to_string();
    }
    parts
        .headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
