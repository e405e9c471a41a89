//! Page arithmetic for list views

use crate::error::ValidationError;
use serde::Serialize;

/// A 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Create a request; page 0 and empty pages are rejected
    pub fn new(page: u32, per_page: u32) -> Result<Self, ValidationError> {
        if page == 0 || per_page == 0 {
            return Err(ValidationError::PageOutOfRange);
        }
        Ok(Self { page, per_page })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.per_page
    }

    /// Rows to skip before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

/// One page of results with the overall total
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }

    /// `ceil(total / per_page)`
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.per_page))
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// e.g. "Showing 11-20 of 45"
    pub fn summary(&self) -> String {
        if self.items.is_empty() {
            return format!("Showing 0 of {}", self.total);
        }
        let start = u64::from(self.page - 1) * u64::from(self.per_page) + 1;
        let end = start + self.items.len() as u64 - 1;
        format!("Showing {}-{} of {}", start, end, self.total)
    }
}
