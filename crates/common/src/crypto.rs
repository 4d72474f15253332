//! Cryptographic utilities shared across Relaygate crates
//!
//! Provides deterministic keyed hashing for API keys, constant-time
//! comparison, and random key generation.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Failed to generate random bytes: {0}")]
    Random(String),
}

/// Compute the deterministic keyed hash of an API key.
///
/// Output is `hex(sha256(secret || ':' || plaintext))`. The same secret
/// must be used at creation, migration, and verification time; rotating
/// it invalidates every stored hash.
pub fn hash_api_key(secret: &str, plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b":");
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time equality for caller-supplied values checked against
/// server secrets. Execution time does not depend on where the inputs
/// first differ.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Generate a new API key: `<prefix>` + 32 random bytes, URL-safe base64
/// encoded (43 chars).
pub fn generate_key(prefix: &str) -> Result<String, CryptoError> {
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::Random(e.to_string()))?;
    Ok(format!("{}{}", prefix, URL_SAFE_NO_PAD.encode(bytes)))
}
