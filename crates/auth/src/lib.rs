//! Authentication middleware for the Relaygate API
//!
//! Decides, for each inbound request, who the caller is (user, admin, or
//! anonymous), how they proved it (bearer token, session cookie, or the
//! static admin key), and whether the proof is acceptable in the current
//! cross-origin context. Gates are axum extractors that work with any
//! router state implementing `FromRef<S>` for `AuthBackend`.

mod apikey;
mod backend;
mod claims;
mod config;
mod context;
mod cookie;
mod error;
mod extract;
mod extractors;
mod jwt;
pub mod mock;
mod origin;
mod repo;
mod types;

pub use apikey::ApiKeyMaterial;
pub use backend::AuthBackend;
pub use claims::SessionClaims;
pub use config::{AuthConfig, ConfigError};
pub use context::AuthContext;
pub use cookie::{request_is_secure, CookiePolicy, SameSitePolicy, SecureMode};
pub use error::AuthError;
pub use extract::{extract_token, TokenSource};
pub use extractors::{AdminUser, AuthUser, ADMIN_API_KEY_HEADER};
pub use jwt::issue_token;
pub use repo::{AdminSecretProvider, RepoError, UserLookup};
pub use types::{AuthMethod, AuthUserRecord, Identity, UserRole, UserStatus};
