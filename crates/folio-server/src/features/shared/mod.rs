//! Shared utilities and types for feature modules
//!
//! - **pagination**: page parameters and metadata
//! - **validation**: field validators and the `FieldErrors` collector
//! - **error_helpers**: constraint violation classification
//! - **test_helpers**: fixture builders (test-only)

pub mod error_helpers;
pub mod pagination;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use pagination::{Paginated, PaginationMetadata, PaginationParams};
pub use validation::{validate_name, FieldErrors};
