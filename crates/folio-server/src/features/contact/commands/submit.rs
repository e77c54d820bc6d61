//! Validate a contact form submission
//!
//! Nothing is stored; the cleaned fields are echoed back.

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::features::shared::validation::{validate_email, validate_name, validate_text, FieldErrors};

pub const MAX_CONTACT_NAME_LENGTH: usize = 100;

/// Email domains accepted by the contact form
pub const ALLOWED_EMAIL_SUFFIXES: [&str; 4] = [".com", ".org", ".edu", ".net"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitContactCommand {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Cleaned contact form data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitContactError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),
}

impl Request<Result<ContactMessage, SubmitContactError>> for SubmitContactCommand {}

impl crate::cqrs::middleware::Command for SubmitContactCommand {}

impl From<SubmitContactError> for AppError {
    fn from(err: SubmitContactError) -> Self {
        match err {
            SubmitContactError::Validation(fields) => AppError::validation(fields),
        }
    }
}

fn has_allowed_domain(email: &str) -> bool {
    let email = email.to_ascii_lowercase();
    ALLOWED_EMAIL_SUFFIXES.iter().any(|suffix| email.ends_with(suffix))
}

impl SubmitContactCommand {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check("name", validate_name(&self.name, MAX_CONTACT_NAME_LENGTH));

        let email = self.email.trim();
        match validate_email(email) {
            Err(e) => errors.add("email", e.to_string()),
            Ok(()) if !has_allowed_domain(email) => errors.add("email", "Please enter a valid email domain"),
            Ok(()) => {},
        }

        errors.check("message", validate_text(&self.message));
        errors.into_result()
    }
}

#[tracing::instrument(skip(command))]
pub async fn handle(command: SubmitContactCommand) -> Result<ContactMessage, SubmitContactError> {
    command.validate()?;

    tracing::info!(email = %command.email.trim(), "Contact form accepted");

    Ok(ContactMessage {
        name: command.name.trim().to_string(),
        email: command.email.trim().to_string(),
        message: command.message.trim().to_string(),
    })
}
