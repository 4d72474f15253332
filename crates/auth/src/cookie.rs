//! Session cookie policy and `Set-Cookie` construction
//!
//! The `(SameSite, Secure)` pair is validated once at configuration load;
//! `Secure=auto` resolves per-request from the TLS/forwarded-proto
//! signal. Clearing reuses the exact same attributes with a negative
//! max-age so the browser accepts the overwrite.

use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderMap, HeaderValue};

use crate::config::ConfigError;

/// `SameSite` attribute for the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSitePolicy {
    #[default]
    Lax,
    Strict,
    None,
}

impl SameSitePolicy {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "lax" => Ok(SameSitePolicy::Lax),
            "strict" => Ok(SameSitePolicy::Strict),
            "none" => Ok(SameSitePolicy::None),
            other => Err(ConfigError::InvalidSameSite(other.to_string())),
        }
    }

    fn attribute(&self) -> &'static str {
        match self {
            SameSitePolicy::Lax => "Lax",
            SameSitePolicy::Strict => "Strict",
            SameSitePolicy::None => "None",
        }
    }
}

/// `Secure` attribute mode. `Auto` follows the request's TLS signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecureMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl SecureMode {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(SecureMode::Auto),
            "true" => Ok(SecureMode::Always),
            "false" => Ok(SecureMode::Never),
            other => Err(ConfigError::InvalidSecureMode(other.to_string())),
        }
    }
}

/// Load-time-validated cookie attributes plus the origin-enforcement
/// switch for cookie-authenticated requests.
#[derive(Debug, Clone, Default)]
pub struct CookiePolicy {
    pub same_site: SameSitePolicy,
    pub secure: SecureMode,
    pub require_origin: bool,
}

impl CookiePolicy {
    /// Cross-field invariant: `SameSite=None` requires HTTPS-only
    /// transmission, so `Secure` must not be forced off. Enforced at
    /// load time, never per-request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.same_site == SameSitePolicy::None && self.secure == SecureMode::Never {
            return Err(ConfigError::InsecureCrossSiteCookie);
        }
        Ok(())
    }

    /// Resolve the `Secure` attribute for the current request.
    pub fn resolve_secure(&self, request_is_secure: bool) -> bool {
        match self.secure {
            SecureMode::Always => true,
            SecureMode::Never => false,
            SecureMode::Auto => request_is_secure,
        }
    }

    /// Build the `Set-Cookie` value issuing a session token.
    pub fn session_cookie(
        &self,
        name: &str,
        token: &str,
        max_age_seconds: i64,
        request_is_secure: bool,
    ) -> Result<HeaderValue, InvalidHeaderValue> {
        self.render(name, token, max_age_seconds, request_is_secure)
    }

    /// Build the `Set-Cookie` value clearing the session cookie. Same
    /// attributes as issuance, negative max-age.
    pub fn clear_cookie(
        &self,
        name: &str,
        request_is_secure: bool,
    ) -> Result<HeaderValue, InvalidHeaderValue> {
        self.render(name, "", -1, request_is_secure)
    }

    fn render(
        &self,
        name: &str,
        value: &str,
        max_age_seconds: i64,
        request_is_secure: bool,
    ) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite={}; Max-Age={}",
            name,
            value,
            self.same_site.attribute(),
            max_age_seconds,
        );
        if self.resolve_secure(request_is_secure) {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}

/// Whether the current request is judged to be over TLS, directly or via
/// the first comma-separated `X-Forwarded-Proto` value.
pub fn request_is_secure(headers: &HeaderMap, request_tls: bool) -> bool {
    if request_tls {
        return true;
    }
    let Some(proto) = headers.get("x-forwarded-proto").and_then(|v| v.to_str().ok()) else {
        return false;
    };
    proto
        .split(',')
        .next()
        .map(|first| first.trim() == "https")
        .unwrap_or(false)
}
