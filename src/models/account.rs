//! Signup and login forms.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Signup form submission.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignupForm {
    #[validate(length(min = 4, max = 14), custom(function = "validate_alphanumeric"))]
    pub username: String,
    #[validate(length(min = 4, max = 64))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub confirmation: String,
}

impl SignupForm {
    /// Lowercase the username; names are compared case-insensitively.
    pub fn normalized(mut self) -> Self {
        self.username = self.username.to_lowercase();
        self
    }

    /// Validate, reporting the first failing rule.
    ///
    /// Username problems win over password problems, which win over a
    /// mismatched confirmation.
    pub fn check(&self) -> Result<(), AccountError> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };
        let fields = errors.field_errors();
        if fields.contains_key("username") {
            Err(AccountError::UsernameInvalid)
        } else if fields.contains_key("password") {
            Err(AccountError::PasswordInvalid)
        } else {
            Err(AccountError::PasswordMismatch)
        }
    }
}

/// Login form submission.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginForm {
    pub fn normalized(mut self) -> Self {
        self.username = self.username.to_lowercase();
        self
    }

    pub fn check(&self) -> Result<(), AccountError> {
        self.validate()
            .map_err(|_| AccountError::MissingCredentials)
    }
}

fn validate_alphanumeric(username: &str) -> Result<(), ValidationError> {
    if username.chars().all(char::is_alphanumeric) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric"))
    }
}

/// Reasons a signup or login is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("Username must be 4-14 letters or numbers.")]
    UsernameInvalid,

    #[error("Password must be 4-64 characters.")]
    PasswordInvalid,

    #[error("Password confirmation does not match.")]
    PasswordMismatch,

    #[error("That username is already taken.")]
    UsernameTaken,

    #[error("Please enter a username and password.")]
    MissingCredentials,

    #[error("User not found.")]
    UserNotFound,

    #[error("Incorrect password.")]
    IncorrectPassword,
}

impl From<AccountError> for crate::error::AppError {
    fn from(err: AccountError) -> Self {
        crate::error::AppError::Rejected(err.to_string())
    }
}
