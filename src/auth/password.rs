//! Delete-password hashing for msgboard.
//!
//! Threads and replies carry a poster-chosen password that gates deletion.
//! Only an Argon2id hash of it is ever stored.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use thiserror::Error;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// Stored hash is not a valid PHC string.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Password verification failed (wrong password).
    #[error("password verification failed")]
    VerificationFailed,
}

/// Hash a delete password using Argon2id with the crate's default parameters.
///
/// Returns a PHC-formatted hash string that includes the salt and parameters.
///
/// # Examples
///
/// ```
/// use msgboard::hash_password;
///
/// let hash = hash_password("letmedelete").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a delete password against a stored hash.
///
/// # Examples
///
/// ```
/// use msgboard::{hash_password, verify_password};
///
/// let hash = hash_password("letmedelete").unwrap();
/// assert!(verify_password("letmedelete", &hash).is_ok());
/// assert!(verify_password("guess", &hash).is_err());
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    // Parameters come from the parsed hash, not from Argon2::default().
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// Check a password against a stored hash, treating an unreadable hash as a mismatch.
pub fn password_matches(password: &str, hash: &str) -> bool {
    match verify_password(password, hash) {
        Ok(()) => true,
        Err(PasswordError::InvalidHash) => {
            tracing::warn!("stored delete password hash is malformed");
            false
        }
        Err(_) => false,
    }
}
