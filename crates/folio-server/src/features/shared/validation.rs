//! Shared validation utilities
//!
//! Field validators return small typed errors; commands collect them into a
//! [`FieldErrors`] map keyed by field name, which becomes the `details`
//! object of a `VALIDATION_ERROR` response.
//!
//! # Examples
//!
//! ```rust,ignore
//! use folio_server::features::shared::validation::{validate_name, FieldErrors};
//!
//! let mut errors = FieldErrors::default();
//! errors.check("title", validate_name(&command.title, 200));
//! errors.into_result()?;
//! ```

use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Field error collection
// ============================================================================

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{}", summarize(.0))]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

fn summarize(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl FieldErrors {
    /// Single-field error map
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    /// Record the error of a validator result, if any
    pub fn check<E: fmt::Display>(&mut self, field: &str, result: Result<(), E>) {
        if let Err(e) = result {
            self.add(field, e.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// One-line description used as the error message
    pub fn summary(&self) -> String {
        summarize(&self.0)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

// ============================================================================
// Field validators
// ============================================================================

/// Errors that can occur during name/title validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("This field may not be blank.")]
    Required,

    #[error("Ensure this field has no more than {max_length} characters.")]
    TooLong { max_length: usize },
}

/// Errors that can occur during username validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsernameValidationError {
    #[error("This field may not be blank.")]
    Required,

    #[error("Ensure this field has no more than 150 characters.")]
    TooLong,

    #[error(
        "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
    )]
    InvalidFormat,
}

/// Errors that can occur during email validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    #[error("This field may not be blank.")]
    Required,

    #[error("Enter a valid email address.")]
    InvalidFormat,
}

/// Errors that can occur during publication year validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum YearValidationError {
    #[error("Publication year cannot be in the future.")]
    InFuture,
}

/// Validate a required free-text field such as a name or title
///
/// Surrounding whitespace does not count towards "non-empty".
pub fn validate_name(name: &str, max_length: usize) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::Required);
    }

    if name.chars().count() > max_length {
        return Err(NameValidationError::TooLong { max_length });
    }

    Ok(())
}

/// Validate required body text without a length cap
pub fn validate_text(text: &str) -> Result<(), NameValidationError> {
    if text.trim().is_empty() {
        return Err(NameValidationError::Required);
    }
    Ok(())
}

/// Validate a username: 1-150 characters of letters, digits and `@.+-_`
pub fn validate_username(username: &str) -> Result<(), UsernameValidationError> {
    if username.is_empty() {
        return Err(UsernameValidationError::Required);
    }

    if username.chars().count() > 150 {
        return Err(UsernameValidationError::TooLong);
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(UsernameValidationError::InvalidFormat);
    }

    Ok(())
}

/// Validate an email address
///
/// Checks for a single `@` with a non-empty local part and a dotted domain
/// whose labels are non-empty.
pub fn validate_email(email: &str) -> Result<(), EmailValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(EmailValidationError::Required);
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or(EmailValidationError::InvalidFormat)?;

    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(EmailValidationError::InvalidFormat);
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(EmailValidationError::InvalidFormat);
    }

    Ok(())
}

/// Reject publication years after the current calendar year
pub fn validate_publication_year(year: i32) -> Result<(), YearValidationError> {
    if year > chrono::Utc::now().year() {
        return Err(YearValidationError::InFuture);
    }
    Ok(())
}
