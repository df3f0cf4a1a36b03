//! Salted one-way password hashing with argon2.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::Rng;

use crate::error::ServiceError;

fn salt() -> Result<SaltString, ServiceError> {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    SaltString::encode_b64(&bytes).map_err(|e| ServiceError::PasswordHash(e.to_string()))
}

/// Hash `password` into a PHC string with a fresh random salt.
pub fn hash(password: &str) -> Result<String, ServiceError> {
    Argon2::default()
        .hash_password(password.as_bytes(), &salt()?)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::PasswordHash(e.to_string()))
}

/// Whether `password` matches the PHC string `hashword`.
///
/// A malformed hash never matches.
pub fn verify(password: &str, hashword: &str) -> bool {
    PasswordHash::new(hashword)
        .ok()
        .is_some_and(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
}
