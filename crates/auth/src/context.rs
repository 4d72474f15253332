//! Request-scoped authentication context
//!
//! A strongly typed object carrying the resolved identity and the
//! transport it arrived over, returned by the gate extractors instead of
//! a string-keyed context bag.

use crate::types::{AuthMethod, Identity};

/// Represents an authenticated caller for the duration of one request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: Identity,
    pub method: AuthMethod,
}

impl AuthContext {
    pub fn new(identity: Identity, method: AuthMethod) -> Self {
        Self { identity, method }
    }

    pub fn is_admin(&self) -> bool {
        self.identity.is_admin()
    }
}
