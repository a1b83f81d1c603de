//! Pagination metadata and paged results.

use serde::Serialize;

/// The `pager` object of a listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl PaginationInfo {
    /// `ceil(total / per_page)`; zero when either is zero.
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page))
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}

/// One page of results plus its pager, when the endpoint sends one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub pagination: Option<PaginationInfo>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, pagination: Option<PaginationInfo>) -> Self {
        Self {
            results,
            pagination,
        }
    }

    pub fn count(&self) -> usize {
        self.results.len()
    }

    /// False when the pager is missing.
    pub fn has_next_page(&self) -> bool {
        self.pagination
            .map(|p| p.has_next_page())
            .unwrap_or(false)
    }

    /// Keep only results matching `predicate`, preserving the pager.
    pub fn filter(self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        Self {
            results: self.results.into_iter().filter(|r| predicate(r)).collect(),
            pagination: self.pagination,
        }
    }
}
