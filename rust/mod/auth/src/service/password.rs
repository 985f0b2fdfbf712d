//! Password hashing — argon2id with per-digest random salt.

use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use bookstore_core::ServiceError;

/// Hash a plaintext password into a self-describing argon2id digest.
pub fn hash_password(plain: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|digest| digest.to_string())
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {}", e)))
}

/// Verify a plaintext password against a stored digest.
///
/// Returns false on mismatch or on an unparseable digest — it never
/// errors, so a corrupt record cannot turn login into a 500.
pub fn verify_password(plain: &str, digest: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
