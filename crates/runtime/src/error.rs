//! Submission error taxonomy and the user-message boundary.
//!
//! Error kinds propagate unchanged through the layers below; translation to
//! a user-facing string happens only here, at the outermost edge. No error is
//! ever downgraded to success.

use quest_core::AdvanceError;

use crate::repository::RepositoryError;
use crate::retry::RetryError;

/// Message shown when retries were exhausted under rate limiting.
pub const MSG_RATE_LIMITED: &str = "System is busy. Please wait a moment and try again.";

/// Message shown when the store failed for any other reason.
pub const MSG_STORE_UNAVAILABLE: &str = "Unable to connect to database. Please try again.";

/// Message shown for failures no user action can address.
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred. Please contact support.";

/// Everything that can go wrong inside a quest submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The submission was rejected before any persistence was attempted.
    #[error(transparent)]
    Validation(#[from] AdvanceError),

    /// The authenticated team has no record in the store. Should not happen
    /// post-authentication; treated as unexpected.
    #[error("team '{team_name}' has no record despite an authenticated session")]
    TeamMissing { team_name: String },

    /// The repository could not read or persist the record.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SubmitError {
    /// The user-facing message for this failure, reproduced verbatim from the
    /// product copy.
    pub fn user_message(&self) -> String {
        match self {
            // Validation Display strings are the product copy already.
            Self::Validation(err) => err.to_string(),
            Self::TeamMissing { .. } => MSG_UNEXPECTED.to_string(),
            Self::Repository(err) => repository_user_message(err).to_string(),
        }
    }
}

/// Shared store-failure message mapping, used by submission and
/// authentication alike.
pub(crate) fn repository_user_message(err: &RepositoryError) -> &'static str {
    match err {
        RepositoryError::Retry(RetryError::RateLimitExceeded { .. }) => MSG_RATE_LIMITED,
        RepositoryError::Retry(RetryError::Store(_)) => MSG_STORE_UNAVAILABLE,
        RepositoryError::TeamNotFound { .. }
        | RepositoryError::IdentityMismatch { .. }
        | RepositoryError::MalformedRow { .. } => MSG_UNEXPECTED,
    }
}

#[cfg(test)]
mod tests {
    use crate::store::StoreError;

    use super::*;

    #[test]
    fn test_validation_messages_pass_through_verbatim() {
        let err = SubmitError::Validation(AdvanceError::EmptyArtifact);
        assert_eq!(err.user_message(), "Artifact cannot be empty");

        let err = SubmitError::Validation(AdvanceError::ArtifactTooLong {
            len: 1001,
            max: 1000,
        });
        assert_eq!(
            err.user_message(),
            "Artifact must be between 1 and 1000 characters (current: 1001)"
        );
    }

    #[test]
    fn test_rate_limit_maps_to_busy_message() {
        let err = SubmitError::Repository(RepositoryError::Retry(RetryError::RateLimitExceeded {
            attempts: 3,
        }));
        assert_eq!(err.user_message(), MSG_RATE_LIMITED);
    }

    #[test]
    fn test_fatal_store_maps_to_connectivity_message() {
        let err = SubmitError::Repository(RepositoryError::Retry(RetryError::Store(
            StoreError::Fatal("bad credentials".to_string()),
        )));
        assert_eq!(err.user_message(), MSG_STORE_UNAVAILABLE);
    }

    #[test]
    fn test_invariant_violations_map_to_unexpected() {
        let missing = SubmitError::TeamMissing {
            team_name: "Alpha".to_string(),
        };
        assert_eq!(missing.user_message(), MSG_UNEXPECTED);

        let mismatch = SubmitError::Repository(RepositoryError::IdentityMismatch {
            expected: "Alpha".to_string(),
            found: "Beta".to_string(),
            row_number: 2,
        });
        assert_eq!(mismatch.user_message(), MSG_UNEXPECTED);
    }
}
