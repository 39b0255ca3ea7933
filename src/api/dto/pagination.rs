//! Pagination query parameters and response metadata.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// Validates the parameters and returns `(page, page_size)`.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: [`DEFAULT_PAGE_SIZE`]
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 1 and [`MAX_PAGE_SIZE`]
    pub fn validate_and_get_page(&self) -> Result<(u32, u32), String> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(format!("Page size must be between 1 and {MAX_PAGE_SIZE}"));
        }

        Ok((page, page_size))
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: i64) -> Self {
        let total_pages = (total_items.max(0) as u64).div_ceil(page_size.max(1) as u64) as u32;
        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}
