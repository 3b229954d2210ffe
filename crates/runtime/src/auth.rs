//! PIN-based team credentials.
//!
//! Hashing and comparison are single bcrypt calls; everything else about
//! credential handling lives outside this crate. A malformed stored hash
//! verifies as a mismatch rather than an error, so a corrupted row can never
//! be logged into but can never panic the engine either.

use tracing::debug;

use crate::error::{MSG_UNEXPECTED, repository_user_message};
use crate::repository::RepositoryError;

/// Errors raised while authenticating a team.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Hashing a fresh PIN failed.
    #[error("credential hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// The store could not be read or the new record could not be created.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// The user-facing message for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Hash(_) => MSG_UNEXPECTED,
            Self::Repository(err) => repository_user_message(err),
        }
    }
}

/// Hash a plaintext PIN for storage.
pub fn hash_pin(pin: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(pin, bcrypt::DEFAULT_COST)?)
}

/// Check a plaintext PIN against a stored hash.
pub fn verify_pin(pin: &str, pin_hash: &str) -> bool {
    match bcrypt::verify(pin, pin_hash) {
        Ok(matched) => matched,
        Err(err) => {
            debug!("stored pin hash did not parse: {}", err);
            false
        }
    }
}
