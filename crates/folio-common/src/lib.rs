//! Folio Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging, and error handling for the Folio workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`FolioError`] and the [`Result`] alias
//! - **Logging**: [`logging::init_logging`] driven by [`logging::LogConfig`]
//! - **Types**: the role, group and permission vocabulary shared by the
//!   server and its tooling
//!
//! # Example
//!
//! ```no_run
//! use folio_common::types::{GroupName, PermissionCode};
//!
//! let editors: GroupName = "Editors".parse().unwrap();
//! assert!(editors.grants().contains(&PermissionCode::CanEdit));
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{FolioError, Result};
