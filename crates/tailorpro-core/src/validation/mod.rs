//! Structural validation of form input.
//!
//! Runs before any provider call. Every failing field contributes one
//! message; messages keep form field order.

use secrecy::ExposeSecret;
use thiserror::Error;
use validator::{ValidateEmail, ValidateLength};

use crate::types::{Credentials, RegistrationProfile};

/// Field length limits.
pub mod limits {
    /// Minimum password length in characters.
    pub const MIN_PASSWORD_LENGTH: u64 = 6;

    /// Minimum full name length in characters.
    pub const MIN_FULL_NAME_LENGTH: u64 = 2;

    /// Maximum full name length in characters.
    pub const MAX_FULL_NAME_LENGTH: u64 = 100;
}

const INVALID_EMAIL: &str = "Invalid email address";
const SHORT_PASSWORD: &str = "Password must be at least 6 characters";
const SHORT_NAME: &str = "Name must be at least 2 characters";
const LONG_NAME: &str = "Name must be at most 100 characters";

/// One or more form fields failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", messages.join(", "))]
pub struct ValidationError {
    /// Field messages in form order.
    pub messages: Vec<String>,
}

impl ValidationError {
    fn check(messages: Vec<String>) -> Result<(), Self> {
        if messages.is_empty() {
            Ok(())
        } else {
            Err(Self { messages })
        }
    }
}

fn check_email(email: &str, messages: &mut Vec<String>) {
    if !email.validate_email() {
        messages.push(INVALID_EMAIL.to_string());
    }
}

fn check_password(password: &str, messages: &mut Vec<String>) {
    if !password.validate_length(Some(limits::MIN_PASSWORD_LENGTH), None, None) {
        messages.push(SHORT_PASSWORD.to_string());
    }
}

/// Validate login credentials.
///
/// # Errors
///
/// Returns `ValidationError` listing every failing field.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), ValidationError> {
    let mut messages = Vec::new();
    check_email(&credentials.email, &mut messages);
    check_password(credentials.password.expose_secret(), &mut messages);
    ValidationError::check(messages)
}

/// Validate a registration profile. The phone number is not checked.
///
/// # Errors
///
/// Returns `ValidationError` listing every failing field.
pub fn validate_registration(profile: &RegistrationProfile) -> Result<(), ValidationError> {
    let mut messages = Vec::new();
    check_email(&profile.email, &mut messages);
    check_password(profile.password.expose_secret(), &mut messages);

    let name = profile.full_name.as_str();
    if !name.validate_length(Some(limits::MIN_FULL_NAME_LENGTH), None, None) {
        messages.push(SHORT_NAME.to_string());
    } else if !name.validate_length(None, Some(limits::MAX_FULL_NAME_LENGTH), None) {
        messages.push(LONG_NAME.to_string());
    }

    ValidationError::check(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_credentials() {
        let creds = Credentials::new("a@b.com", "secret1");
        assert!(validate_credentials(&creds).is_ok());
    }

    #[test]
    fn test_invalid_email() {
        let creds = Credentials::new("not-an-email", "secret1");
        let err = validate_credentials(&creds).unwrap_err();
        assert_eq!(err.messages, vec![INVALID_EMAIL.to_string()]);
    }

    #[test]
    fn test_messages_concatenated_in_field_order() {
        let creds = Credentials::new("nope", "123");
        let err = validate_credentials(&creds).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid email address, Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_password_length_counts_characters() {
        // Six multi-byte characters.
        let creds = Credentials::new("a@b.com", "éééééé");
        assert!(validate_credentials(&creds).is_ok());
    }

    #[test]
    fn test_registration_name_bounds() {
        let short = RegistrationProfile::new("a@b.com", "secret1", "A", None);
        assert_eq!(
            validate_registration(&short).unwrap_err().messages,
            vec![SHORT_NAME.to_string()]
        );

        let long = RegistrationProfile::new("a@b.com", "secret1", "x".repeat(101), None);
        assert_eq!(
            validate_registration(&long).unwrap_err().messages,
            vec![LONG_NAME.to_string()]
        );

        let ok = RegistrationProfile::new("a@b.com", "secret1", "x".repeat(100), None);
        assert!(validate_registration(&ok).is_ok());
    }

    #[test]
    fn test_phone_unvalidated() {
        let profile = RegistrationProfile::new(
            "a@b.com",
            "secret1",
            "Ada Lovelace",
            Some("call me maybe".to_string()),
        );
        assert!(validate_registration(&profile).is_ok());
    }

    #[test]
    fn test_registration_collects_all_fields() {
        let profile = RegistrationProfile::new("bad", "1", "", None);
        let err = validate_registration(&profile).unwrap_err();
        assert_eq!(err.messages.len(), 3);
    }
}
