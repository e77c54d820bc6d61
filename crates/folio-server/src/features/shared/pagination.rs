//! Shared pagination utilities
//!
//! ```rust,ignore
//! use folio_server::features::shared::pagination::{PaginationParams, Paginated};
//!
//! let params = PaginationParams::new(Some(2), Some(10));
//! let offset = params.offset();
//! // ...fetch rows...
//! let page = Paginated::from_items(rows, &params, total);
//! ```

use serde::{Deserialize, Serialize};

/// Default number of posts per page
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Upper bound for `per_page`
pub const MAX_PER_PAGE: i64 = 100;

/// Highest page number whose offset still fits in an `i64`
pub const MAX_PAGE: i64 = i64::MAX / MAX_PER_PAGE;

/// Page request parameters (1-indexed)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }

    /// Reject explicit out-of-range values instead of silently clamping
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(page) = self.page {
            if page < 1 {
                return Err("Page must be greater than 0");
            }
            if page > MAX_PAGE {
                return Err("Page is out of range");
            }
        }
        if let Some(per_page) = self.per_page {
            if !(1..=MAX_PER_PAGE).contains(&per_page) {
                return Err("Per page must be between 1 and 100");
            }
        }
        Ok(())
    }
}

/// Pagination metadata for response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMetadata {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let pages = if total == 0 { 0 } else { (total + per_page - 1) / per_page };

        Self {
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }

    pub fn from_params(params: &PaginationParams, total: i64) -> Self {
        Self::new(params.page(), params.per_page(), total)
    }
}

/// A page of items plus its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> Paginated<T> {
    pub fn from_items(items: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        Self {
            items,
            pagination: PaginationMetadata::from_params(params, total),
        }
    }
}
