//! Error taxonomy of the authentication flows.

use tailorpro_core::{Channel, UserId, ValidationError};
use thiserror::Error;

/// Errors reported by an auth provider.
///
/// The display text is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email unknown or password wrong.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// An account already exists for this email.
    #[error("User already registered")]
    UserExists,

    /// Provider rejected the request with its own message.
    #[error("{0}")]
    Rejected(String),

    /// Session token could not be issued or read.
    #[error("Token error: {0}")]
    Token(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Why no usable role could be read for an identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleLookupError {
    /// No role record exists.
    #[error("No role recorded for user {0}")]
    NotFound(UserId),

    /// More than one role record exists.
    #[error("{count} role records found for user {user_id}")]
    Ambiguous {
        /// Identity looked up.
        user_id: UserId,
        /// Number of records found.
        count: usize,
    },

    /// The stored role is not one this application knows.
    #[error("Unrecognized role: {0}")]
    Unrecognized(String),

    /// Directory call failed.
    #[error("Role directory error: {0}")]
    Directory(String),
}

/// Errors from writing to a role directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The identity already has a role record.
    #[error("Role already assigned for user {0}")]
    AlreadyAssigned(UserId),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Failure of a sign-in or sign-up submit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Form input failed structural checks; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The provider rejected the credentials or registration.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The recorded role does not belong to the selected channel.
    #[error("{}", .required.mismatch_message())]
    ChannelMismatch {
        /// Channel the user signed in through.
        required: Channel,
    },

    /// The account was created but its role record was not.
    #[error("Your account was created but its role could not be recorded: {0}")]
    RoleAssignment(DirectoryError),

    /// The form is not accepting input (session check pending or a submit in flight).
    #[error("The form is not ready for another submission")]
    NotInteractive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_names_channel() {
        let err = FlowError::ChannelMismatch {
            required: Channel::Administrator,
        };
        assert_eq!(err.to_string(), "This login is for administrators only.");
    }

    #[test]
    fn test_provider_message_verbatim() {
        let err = FlowError::from(AuthError::Rejected("Email not confirmed".to_string()));
        assert_eq!(err.to_string(), "Email not confirmed");
    }

    #[test]
    fn test_validation_message_passthrough() {
        let err = FlowError::from(ValidationError {
            messages: vec!["Invalid email address".to_string()],
        });
        assert_eq!(err.to_string(), "Invalid email address");
    }
}
