//! Shared primitives for Relaygate services
//!
//! This crate carries the credential-hashing contract used by both the
//! key-management endpoints and the key-based relay authentication path.
//! Every consumer must hash and compare keys the same way, so the
//! primitives live here rather than in any single service crate.

pub mod crypto;

pub use crypto::{constant_time_eq, generate_key, hash_api_key, CryptoError};
