//! Session token claims

use serde::{Deserialize, Serialize};

/// Decoded payload of a session token.
///
/// Produced by the claims validator, consumed once per request.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: u64,
    /// Expires at (unix seconds); must be strictly in the future at
    /// validation time
    pub exp: u64,
}
