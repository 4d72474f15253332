//! Capability interfaces consumed by the authentication gates
//!
//! One narrow trait per external dependency, injected once at backend
//! construction. Production wires these to the platform repositories;
//! tests substitute the in-memory fakes from [`crate::mock`].

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::types::AuthUserRecord;

/// Failure of an external lookup. The gates fail closed on these; the
/// detail is for operator logs only and never reaches the caller.
#[derive(Debug, Error)]
#[error("repository error: {0}")]
pub struct RepoError(pub String);

/// User lookups needed to resolve a principal.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<AuthUserRecord>, RepoError>;

    /// The account the static admin key authenticates as.
    async fn get_first_admin(&self) -> Result<Option<AuthUserRecord>, RepoError>;
}

/// Access to the configured admin API key.
#[async_trait]
pub trait AdminSecretProvider: Send + Sync {
    /// Returns `None` when no admin key is configured.
    async fn admin_api_key(&self) -> Result<Option<String>, RepoError>;
}
