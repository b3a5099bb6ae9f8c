//! Best-effort household security.
//!
//! The admin password is kept only as a SHA-256 hex digest and compared as a
//! plain string; the approval PIN is a shared 4 digit code with no lockout.
//! This deters a curious child, nothing more.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `input`.
pub fn hash_password(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare a plaintext attempt against the stored digest.
pub fn verify_admin_password(attempt: &str, stored_hash: &str) -> bool {
    hash_password(attempt) == stored_hash
}

pub fn verify_pin(attempt: &str, current_pin: &str) -> bool {
    attempt == current_pin
}
