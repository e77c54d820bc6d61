//! Password hashing and password policy
//!
//! Hashes are Argon2id PHC strings. Hashing and verification are CPU bound,
//! so both run on the blocking pool.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::Argon2;
use thiserror::Error;

use crate::features::shared::validation::FieldErrors;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "password123", "12345678", "123456789", "1234567890",
    "qwerty", "qwertyuiop", "qwerty123", "abc12345", "iloveyou", "letmein",
    "welcome", "welcome1", "sunshine", "princess", "football", "baseball",
    "dragon", "monkey", "master", "superman", "trustno1", "starwars",
    "passw0rd", "admin123", "administrator", "11111111", "00000000", "computer",
];

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Password task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Hash a password with Argon2id and a random salt
pub async fn hash_password(password: &str) -> Result<String, PasswordError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    })
    .await?
}

/// Check a password against a stored PHC hash
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await?
}

/// Policy messages for a candidate password; empty when acceptable
pub fn password_problems(password: &str, username: &str) -> Vec<String> {
    let mut problems = Vec::new();

    if !username.is_empty() && is_similar(password, username) {
        problems.push("The password is too similar to the username.".to_string());
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "This password is too short. It must contain at least {} characters.",
            MIN_PASSWORD_LENGTH
        ));
    }

    let lower = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lower.as_str()) {
        problems.push("This password is too common.".to_string());
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }

    problems
}

fn is_similar(password: &str, username: &str) -> bool {
    let password = password.to_lowercase();
    let username = username.to_lowercase();
    password.contains(&username) || username.contains(&password)
}

/// Validate a `password1`/`password2` pair into field errors
pub fn check_new_password(
    errors: &mut FieldErrors,
    password1: &str,
    password2: &str,
    username: &str,
) {
    if password1.is_empty() {
        errors.add("password1", "This field may not be blank.");
        return;
    }

    if password1 != password2 {
        errors.add("password2", "The two password fields didn't match.");
        return;
    }

    for problem in password_problems(password1, username) {
        errors.add("password2", problem);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("correct horse").await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).await.unwrap());
        assert!(!verify_password("wrong horse", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let a = hash_password("same-password").await.unwrap();
        let b = hash_password("same-password").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string").await,
            Err(PasswordError::MalformedHash(_))
        ));
    }

    #[test]
    fn test_password_policy() {
        assert!(password_problems("Tr1cky-Bookworm", "reader").is_empty());
        assert_eq!(password_problems("short1", "reader").len(), 1);
        assert!(password_problems("12345678901", "reader")
            .contains(&"This password is entirely numeric.".to_string()));
        assert!(password_problems("Password1", "reader")
            .contains(&"This password is too common.".to_string()));
        assert!(password_problems("reader-2024!", "Reader")
            .contains(&"The password is too similar to the username.".to_string()));
    }

    #[test]
    fn test_check_new_password_mismatch() {
        let mut errors = FieldErrors::default();
        check_new_password(&mut errors, "Tr1cky-Bookworm", "Tr1cky-Bookwork", "reader");
        assert_eq!(errors.messages("password2"), ["The two password fields didn't match."]);

        let mut errors = FieldErrors::default();
        check_new_password(&mut errors, "Tr1cky-Bookworm", "Tr1cky-Bookworm", "reader");
        assert!(errors.is_empty());
    }
}
