//! Validation error types and form-field checks
//!
//! Field-level rules shared by the registration, business, and review
//! forms. Handlers map `ValidationError` to a 400 response; the store
//! never sees an invalid value.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Usernames are login identifiers, not display names: short and URL-safe.
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,32}$").expect("username regex"));

pub const PASSWORD_MAX: usize = 128;
pub const BUSINESS_NAME_MAX: usize = 120;
pub const COMMENT_MAX: usize = 2000;

/// Validation error for domain models
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., username)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },

    /// Numeric field outside its allowed range
    OutOfRange { field: &'static str, min: i64, max: i64, value: i64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::OutOfRange { field, min, max, value } => {
                write!(f, "{} must be between {} and {}, got {}", field, min, max, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a username: 3-32 characters, alphanumeric plus `_` and `-`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::Empty { field: "username" });
    }
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::InvalidFormat {
            field: "username",
            reason: "must be 3-32 characters: letters, digits, '_' or '-'",
        });
    }
    Ok(())
}

/// Validate a password before hashing. Length only; content is free-form.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Empty { field: "password" });
    }
    if password.len() > PASSWORD_MAX {
        return Err(ValidationError::TooLong {
            field: "password",
            max: PASSWORD_MAX,
        });
    }
    Ok(())
}

/// Validate a business name. Returns the trimmed name on success.
pub fn validate_business_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field: "name" });
    }
    if trimmed.len() > BUSINESS_NAME_MAX {
        return Err(ValidationError::TooLong {
            field: "name",
            max: BUSINESS_NAME_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Validate a review comment. Empty is fine; runaway bodies are not.
pub fn validate_comment(comment: &str) -> Result<(), ValidationError> {
    if comment.len() > COMMENT_MAX {
        return Err(ValidationError::TooLong {
            field: "comment",
            max: COMMENT_MAX,
        });
    }
    Ok(())
}
