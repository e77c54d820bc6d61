//! Error types for Folio

use thiserror::Error;

/// Result type alias for Folio operations
pub type Result<T> = std::result::Result<T, FolioError>;

/// Main error type shared across Folio crates
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown role '{0}': expected Admin, Librarian or Member")]
    InvalidRole(String),

    #[error("Unknown group '{0}': expected Viewers, Editors or Admins")]
    InvalidGroup(String),

    #[error("Unknown permission '{0}'")]
    InvalidPermission(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
