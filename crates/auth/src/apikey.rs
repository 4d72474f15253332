//! API key credential material
//!
//! Hashing, masking, and the legacy-plaintext migration path. Exactly
//! one of `key`/`key_hash` is the authoritative credential at any time;
//! both set at once marks a record mid-migration. `key_last4` is the
//! only material safe to render in listings.

use relaygate_common::crypto::{constant_time_eq, generate_key, hash_api_key, CryptoError};

/// Stored credential material for one API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyMaterial {
    /// Legacy plaintext key; cleared once migrated and never resurrected
    pub key: Option<String>,
    /// Keyed hash of the key, used for authentication and dedup
    pub key_hash: Option<String>,
    /// Final 4 characters, kept for masked display
    pub key_last4: String,
}

impl ApiKeyMaterial {
    /// Create material for a caller-supplied plaintext. The hash is
    /// computed eagerly; the plaintext itself is the caller's to return
    /// exactly once and is not stored.
    pub fn new(plaintext: &str, secret: &str) -> Self {
        Self {
            key: None,
            key_hash: Some(hash_api_key(secret, plaintext)),
            key_last4: last4(plaintext),
        }
    }

    /// Generate a fresh random key and its material. Returns the
    /// plaintext alongside; this is the only time it exists outside the
    /// caller's response.
    pub fn generate(prefix: &str, secret: &str) -> Result<(Self, String), CryptoError> {
        let plaintext = generate_key(prefix)?;
        let material = Self::new(&plaintext, secret);
        Ok((material, plaintext))
    }

    /// Shape of a record written before hashing existed. Kept for the
    /// migration path and its tests.
    pub fn from_legacy(plaintext: &str) -> Self {
        Self {
            key: Some(plaintext.to_string()),
            key_hash: None,
            key_last4: last4(plaintext),
        }
    }

    /// Masked representation for listings; built from `key_last4` only.
    pub fn masked(&self) -> String {
        format!("****{}", self.key_last4)
    }

    /// Check a supplied plaintext against this material.
    ///
    /// The hash path hashes the supplied value with the same keyed hash
    /// used at creation and compares constant-time. Records not yet
    /// migrated fall back to constant-time comparison against the
    /// stored plaintext.
    pub fn authenticate(&self, supplied: &str, secret: &str) -> bool {
        if let Some(stored_hash) = &self.key_hash {
            let supplied_hash = hash_api_key(secret, supplied);
            return constant_time_eq(supplied_hash.as_bytes(), stored_hash.as_bytes());
        }
        match &self.key {
            Some(stored) => constant_time_eq(supplied.as_bytes(), stored.as_bytes()),
            None => false,
        }
    }

    /// Migrate a legacy record in place: compute the hash, clear the
    /// plaintext, keep `key_last4`. Idempotent — already-hashed records
    /// are untouched, so concurrent migrations of the same record
    /// converge on identical state.
    pub fn migrate(&mut self, secret: &str) {
        if self.key_hash.is_some() {
            self.key = None;
            return;
        }
        let Some(plaintext) = self.key.take() else {
            return;
        };
        self.key_hash = Some(hash_api_key(secret, &plaintext));
    }

    /// A record is mid-migration when it still carries its plaintext.
    pub fn is_migrated(&self) -> bool {
        self.key_hash.is_some() && self.key.is_none()
    }
}

fn last4(plaintext: &str) -> String {
    let chars: Vec<char> = plaintext.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}
