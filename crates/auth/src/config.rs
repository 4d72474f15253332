//! Authentication configuration
//!
//! Loaded once from the environment (12-factor), validated eagerly, and
//! shared read-only across requests. Request handling never revalidates
//! configuration.

use std::env;

use thiserror::Error;

use crate::cookie::{CookiePolicy, SameSitePolicy, SecureMode};

const DEFAULT_COOKIE_NAME: &str = "relaygate_session";
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 86_400;
const DEFAULT_API_KEY_PREFIX: &str = "sk-";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("RELAYGATE_JWT_SECRET is required")]
    MissingJwtSecret,

    #[error("RELAYGATE_API_KEY_SECRET is required")]
    MissingApiKeySecret,

    #[error("auth cookie SameSite must be lax/strict/none, got '{0}'")]
    InvalidSameSite(String),

    #[error("auth cookie Secure must be auto/true/false, got '{0}'")]
    InvalidSecureMode(String),

    #[error("auth cookie Secure cannot be false when SameSite is none")]
    InsecureCrossSiteCookie,

    #[error("RELAYGATE_TOKEN_TTL_SECONDS must be a positive integer, got '{0}'")]
    InvalidTokenTtl(String),
}

/// Immutable authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    /// Session token / cookie lifetime
    pub token_ttl_seconds: u64,
    /// Name of the HttpOnly session cookie
    pub cookie_name: String,
    pub cookie_policy: CookiePolicy,
    /// Origin allow-list; empty means same-origin only
    pub allowed_origins: Vec<String>,
    /// Keyed-hash secret for stored API keys
    pub api_key_secret: String,
    /// Prefix for generated API keys
    pub api_key_prefix: String,
}

impl AuthConfig {
    /// Minimal configuration with platform defaults for everything but
    /// the secrets.
    pub fn new(jwt_secret: impl Into<String>, api_key_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_policy: CookiePolicy::default(),
            allowed_origins: Vec::new(),
            api_key_secret: api_key_secret.into(),
            api_key_prefix: DEFAULT_API_KEY_PREFIX.to_string(),
        }
    }

    /// Load configuration from environment variables and validate it.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let token_ttl_seconds = match env::var("RELAYGATE_TOKEN_TTL_SECONDS") {
            Ok(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or(ConfigError::InvalidTokenTtl(raw))?,
            Err(_) => DEFAULT_TOKEN_TTL_SECONDS,
        };

        let cookie_policy = CookiePolicy {
            same_site: SameSitePolicy::parse(
                &env::var("RELAYGATE_AUTH_COOKIE_SAME_SITE").unwrap_or_default(),
            )?,
            secure: SecureMode::parse(
                &env::var("RELAYGATE_AUTH_COOKIE_SECURE").unwrap_or_default(),
            )?,
            require_origin: env::var("RELAYGATE_AUTH_COOKIE_REQUIRE_ORIGIN")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        };

        let config = Self {
            jwt_secret: env::var("RELAYGATE_JWT_SECRET").unwrap_or_default(),
            token_ttl_seconds,
            cookie_name: env::var("RELAYGATE_AUTH_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_COOKIE_NAME.to_string()),
            cookie_policy,
            allowed_origins: parse_comma_list(
                &env::var("RELAYGATE_ALLOWED_ORIGINS").unwrap_or_default(),
            ),
            api_key_secret: env::var("RELAYGATE_API_KEY_SECRET").unwrap_or_default(),
            api_key_prefix: env::var("RELAYGATE_API_KEY_PREFIX")
                .unwrap_or_else(|_| DEFAULT_API_KEY_PREFIX.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Eager validation; nothing here is re-checked per request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.api_key_secret.is_empty() {
            return Err(ConfigError::MissingApiKeySecret);
        }
        self.cookie_policy.validate()
    }

    pub fn cookie_max_age_seconds(&self) -> i64 {
        self.token_ttl_seconds as i64
    }
}

fn parse_comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
