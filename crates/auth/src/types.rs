//! Identity types shared by the authentication gates
//!
//! Lightweight views of the persisted user row. These carry only the
//! fields needed for authentication decisions; handlers needing full
//! user data load it from their own repository.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Persisted user record as seen by the auth gates.
#[derive(Debug, Clone)]
pub struct AuthUserRecord {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User role for the binary admin/non-admin check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// Account status. A disabled account may still hold an unexpired,
/// structurally valid token, so the gates check status on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Disabled,
}

impl UserStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, UserStatus::Active)
    }
}

/// Resolved principal attached to a request.
///
/// Built per-request from the persisted record, never mutated, discarded
/// at request end.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
    pub status: UserStatus,
}

impl Identity {
    pub fn from_record(record: &AuthUserRecord) -> Self {
        Self {
            user_id: record.id,
            role: record.role,
            status: record.status,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// How the request authenticated, published for audit/observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Cookie,
    Jwt,
    AdminApiKey,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Cookie => "cookie",
            AuthMethod::Jwt => "jwt",
            AuthMethod::AdminApiKey => "admin_api_key",
        }
    }
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
