//! User validation rules

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::Host;
use validator::ValidateEmail;

use crate::domain::DomainError;

/// Maximum length of an email address
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length, in characters, of a username
pub const MAX_USERNAME_LENGTH: usize = 80;

/// Maximum length, in characters, of a first or last name
pub const MAX_NAME_LENGTH: usize = 80;

/// Reserved names (RFC 6761 and friends) that never receive mail
const SPECIAL_USE_DOMAINS: [&str; 6] = ["arpa", "invalid", "local", "localhost", "onion", "test"];

/// Dotted ASCII host name whose last label starts with a letter.
/// Internationalized domains are matched in their punycode form.
static EMAIL_DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$",
    )
    .unwrap()
});

/// Errors raised when a user field fails its format rule
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    #[error("Username must be alphanumeric")]
    InvalidUsername,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("First name must be at most 80 characters")]
    FirstNameTooLong,

    #[error("Last name must be at most 80 characters")]
    LastNameTooLong,
}

impl UserValidationError {
    /// Name of the field the rule guards
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidUsername => "username",
            Self::InvalidEmail => "email",
            Self::FirstNameTooLong => "first_name",
            Self::LastNameTooLong => "last_name",
        }
    }
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        DomainError::validation(err.field(), err.to_string())
    }
}

/// Validate a username
///
/// Rules:
/// - Cannot be empty
/// - At most 80 characters
/// - Only ASCII letters and digits
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty()
        || username.len() > MAX_USERNAME_LENGTH
        || !username.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(UserValidationError::InvalidUsername);
    }

    Ok(())
}

/// Validate optional first and last names: free-form, at most 80 characters
pub fn validate_names(
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<(), UserValidationError> {
    if first_name.is_some_and(exceeds_name_length) {
        return Err(UserValidationError::FirstNameTooLong);
    }

    if last_name.is_some_and(exceeds_name_length) {
        return Err(UserValidationError::LastNameTooLong);
    }

    Ok(())
}

fn exceeds_name_length(name: &str) -> bool {
    name.chars().count() > MAX_NAME_LENGTH
}

/// Validate an email address (syntax only, deliverability is never checked)
///
/// Rules:
/// - `local-part@domain` with a valid local part
/// - Domain must be a dotted host name; Unicode labels are allowed
/// - Domain literals and special-use names (`.local`, `.test`, ...) are rejected
/// - At most 254 characters overall
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.len() > MAX_EMAIL_LENGTH || !email.validate_email() {
        return Err(UserValidationError::InvalidEmail);
    }

    let domain = match email.rsplit_once('@') {
        Some((_, domain)) => domain,
        None => return Err(UserValidationError::InvalidEmail),
    };

    let ascii_domain = match Host::parse(domain) {
        Ok(Host::Domain(ascii_domain)) => ascii_domain,
        _ => return Err(UserValidationError::InvalidEmail),
    };

    if !EMAIL_DOMAIN_PATTERN.is_match(&ascii_domain) || is_special_use(&ascii_domain) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

fn is_special_use(ascii_domain: &str) -> bool {
    let domain = ascii_domain.trim_end_matches('.');

    SPECIAL_USE_DOMAINS.iter().any(|reserved| {
        domain == *reserved
            || domain
                .strip_suffix(reserved)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}
