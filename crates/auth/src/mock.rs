//! In-memory fakes for the capability interfaces
//!
//! Used by unit and integration tests; also handy for local development
//! without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::repo::{AdminSecretProvider, RepoError, UserLookup};
use crate::types::{AuthUserRecord, UserRole, UserStatus};

/// In-memory user store. Tracks lookup counts so tests can assert which
/// authentication path ran.
#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<Uuid, AuthUserRecord>>,
    lookups: AtomicUsize,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: AuthUserRecord) {
        self.users.lock().unwrap().insert(record.id, record);
    }

    /// Build and insert a user, returning its record.
    pub fn add_user(&self, role: UserRole, status: UserStatus) -> AuthUserRecord {
        let now = Utc::now();
        let record = AuthUserRecord {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", Uuid::new_v4()),
            role,
            status,
            created_at: now,
            updated_at: now,
        };
        self.insert(record.clone());
        record
    }

    /// Number of `get_by_id`/`get_first_admin` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserLookup for InMemoryUsers {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<AuthUserRecord>, RepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn get_first_admin(&self) -> Result<Option<AuthUserRecord>, RepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let users = self.users.lock().unwrap();
        let mut admins: Vec<&AuthUserRecord> = users
            .values()
            .filter(|u| u.role == UserRole::Admin)
            .collect();
        admins.sort_by_key(|u| u.created_at);
        Ok(admins.first().map(|u| (*u).clone()))
    }
}

/// User store whose every lookup fails, for exercising the fail-closed
/// repository-error paths.
pub struct FailingUsers;

#[async_trait]
impl UserLookup for FailingUsers {
    async fn get_by_id(&self, _id: Uuid) -> Result<Option<AuthUserRecord>, RepoError> {
        Err(RepoError("connection refused".to_string()))
    }

    async fn get_first_admin(&self) -> Result<Option<AuthUserRecord>, RepoError> {
        Err(RepoError("connection refused".to_string()))
    }
}

/// Fixed settings store.
#[derive(Default)]
pub struct StaticSettings {
    admin_api_key: Option<String>,
}

impl StaticSettings {
    pub fn with_admin_key(key: impl Into<String>) -> Self {
        Self {
            admin_api_key: Some(key.into()),
        }
    }

    /// No admin key configured.
    pub fn unset() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminSecretProvider for StaticSettings {
    async fn admin_api_key(&self) -> Result<Option<String>, RepoError> {
        Ok(self.admin_api_key.clone())
    }
}

/// Settings store whose lookup fails.
pub struct FailingSettings;

#[async_trait]
impl AdminSecretProvider for FailingSettings {
    async fn admin_api_key(&self) -> Result<Option<String>, RepoError> {
        Err(RepoError("connection refused".to_string()))
    }
}
