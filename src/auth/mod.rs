//! Credential handling for msgboard.
//!
//! There are no user accounts; the only credentials are per-post delete passwords.

mod password;

pub use password::{hash_password, password_matches, verify_password, PasswordError};
