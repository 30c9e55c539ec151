//! Page requests and the pagination envelope returned by list queries.
//!
//! Pages are 1-based. A page number below 1 or past the last page is "out of
//! range" and produces an empty page rather than an error; only a page size
//! below 1 is rejected, since it makes the page count undefined.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A validated request for one page of a result set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page_number: i32,
    page_size: i32,
}

impl PageRequest {
    pub const DEFAULT_PAGE_NUMBER: i32 = 1;
    pub const DEFAULT_PAGE_SIZE: i32 = 10;

    pub fn new(page_number: i32, page_size: i32) -> DomainResult<Self> {
        if page_size < 1 {
            return Err(DomainError::validation(
                "pageSize",
                format!("The value '{page_size}' is not valid. Page size must be at least 1."),
            ));
        }
        Ok(Self {
            page_number,
            page_size,
        })
    }

    pub fn page_number(&self) -> i32 {
        self.page_number
    }

    pub fn page_size(&self) -> i32 {
        self.page_size
    }

    /// Number of items to skip, or `None` when the page number is out of range.
    pub fn offset(&self) -> Option<usize> {
        if self.page_number < 1 {
            return None;
        }
        let skipped_pages = usize::try_from(self.page_number - 1).ok()?;
        skipped_pages.checked_mul(self.limit())
    }

    /// Maximum number of items on this page.
    pub fn limit(&self) -> usize {
        // page_size >= 1 is enforced by `new`.
        usize::try_from(self.page_size).unwrap_or(1)
    }

    /// `ceil(total_items / page_size)`, saturating at `i32::MAX`.
    pub fn total_pages(&self, total_items: usize) -> i32 {
        i32::try_from(total_items.div_ceil(self.limit())).unwrap_or(i32::MAX)
    }

    /// Borrow the items of this page from an already ordered slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        match self.offset() {
            Some(start) if start < items.len() => {
                let end = start.saturating_add(self.limit()).min(items.len());
                &items[start..end]
            }
            _ => &[],
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: Self::DEFAULT_PAGE_NUMBER,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the total page count.
///
/// Wire shape: `{ "result": [...], "totalPages": n }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult<T> {
    pub result: Vec<T>,
    pub total_pages: i32,
}

impl<T> PaginationResult<T> {
    pub fn new(result: Vec<T>, total_pages: i32) -> Self {
        Self {
            result,
            total_pages,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Build the page from the full, ordered item list.
    pub fn from_items(items: &[T], page: PageRequest) -> Self
    where
        T: Clone,
    {
        Self::new(page.slice(items).to_vec(), page.total_pages(items.len()))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginationResult<U> {
        PaginationResult {
            result: self.result.into_iter().map(f).collect(),
            total_pages: self.total_pages,
        }
    }
}
