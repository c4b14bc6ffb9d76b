//! Shared pagination utilities
//!
//! List queries accept `page` and `per_page` as plain query-string fields and
//! convert them through [`PaginationParams`] before touching the database.
//!
//! ```rust,ignore
//! let params = PaginationParams::new(query.page, query.per_page);
//! params.validate()?;
//!
//! // ... LIMIT params.per_page() OFFSET params.offset() ...
//! let pagination = PaginationMetadata::from_params(&params, total);
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("Page must be greater than 0")]
    InvalidPage,
    #[error("Per page must be between 1 and {MAX_PER_PAGE}")]
    InvalidPerPage,
}

/// Requested page window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// Items per page. Defaults to 20.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// Rows to skip for the SQL OFFSET clause
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }

    pub fn validate(&self) -> Result<(), PaginationError> {
        if matches!(self.page, Some(page) if page < 1) {
            return Err(PaginationError::InvalidPage);
        }
        if matches!(self.per_page, Some(per_page) if !(1..=MAX_PER_PAGE).contains(&per_page)) {
            return Err(PaginationError::InvalidPerPage);
        }
        Ok(())
    }

    /// The same window with defaults filled in
    ///
    /// Used when building cache keys so `?page=1` and no page share an entry.
    pub fn resolved(&self) -> Self {
        Self::new(Some(self.page()), Some(self.per_page()))
    }
}

/// Pagination metadata returned under `meta.pagination`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
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
        let pages = if total <= 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };

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

/// One page of results plus its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, pagination: PaginationMetadata) -> Self {
        Self { items, pagination }
    }

    pub fn from_items(items: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        Self {
            items,
            pagination: PaginationMetadata::from_params(params, total),
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_params_offset() {
        let params = PaginationParams::new(Some(3), Some(50));
        assert_eq!(params.offset(), 100);
    }

    #[test]
    fn test_pagination_params_validation() {
        assert!(PaginationParams::new(Some(1), Some(100)).validate().is_ok());
        assert_eq!(
            PaginationParams::new(Some(0), None).validate(),
            Err(PaginationError::InvalidPage)
        );
        assert_eq!(
            PaginationParams::new(None, Some(101)).validate(),
            Err(PaginationError::InvalidPerPage)
        );
        assert_eq!(
            PaginationParams::new(None, Some(0)).validate(),
            Err(PaginationError::InvalidPerPage)
        );
    }

    #[test]
    fn test_resolved_fills_defaults() {
        let resolved = PaginationParams::default().resolved();
        assert_eq!(resolved, PaginationParams::new(Some(1), Some(20)));
    }

    #[test]
    fn test_pagination_metadata() {
        let meta = PaginationMetadata::new(2, 10, 25);
        assert_eq!(meta.pages, 3);
        assert!(meta.has_prev);
        assert!(meta.has_next);

        let last = PaginationMetadata::new(3, 10, 25);
        assert!(!last.has_next);
    }

    #[test]
    fn test_pagination_metadata_empty() {
        let meta = PaginationMetadata::new(1, 10, 0);
        assert_eq!(meta.pages, 0);
        assert!(!meta.has_prev);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_paginated_map() {
        let paginated = Paginated::new(vec![1, 2, 3], PaginationMetadata::new(1, 10, 3));
        let mapped = paginated.map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.pagination.total, 3);
    }
}
