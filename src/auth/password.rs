//! Password hashing.
//!
//! New accounts get bcrypt hashes. Older accounts (including the demo seed)
//! carry a bare lowercase-hex SHA-256 digest, which is still accepted at login.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// bcrypt cost used for new accounts
pub const BCRYPT_COST: u32 = 12;

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String> {
    hash_password_with_cost(password, BCRYPT_COST)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost).context("Failed to hash password")
}

/// Check a password against a stored bcrypt hash or legacy SHA-256 digest.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    if is_bcrypt_hash(stored_hash) {
        return bcrypt::verify(password, stored_hash).unwrap_or(false);
    }

    let digest = hex::encode(Sha256::digest(password.as_bytes()));
    constant_time_eq(digest.as_bytes(), stored_hash.to_ascii_lowercase().as_bytes())
}

fn is_bcrypt_hash(s: &str) -> bool {
    s.starts_with("$2a$") || s.starts_with("$2b$") || s.starts_with("$2y$")
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
