//! Token digest utilities.
//!
//! Voter tokens and admin API tokens are random bearer secrets. Only their
//! SHA-256 digest is stored; the raw token is returned to the client once
//! and never persisted.

use sha2::{Digest, Sha256};

/// Compute the hex-encoded SHA-256 digest of a raw token.
#[must_use]
pub fn token_digest(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
