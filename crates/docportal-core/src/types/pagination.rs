//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Page size used by every listing in the portal.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub per_page: u64,
}

impl PageRequest {
    /// Create a new page request. Page numbers below 1 are treated as 1.
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// A request for the given page with the default page size.
    pub fn page(page: u64) -> Self {
        Self::new(page, DEFAULT_PAGE_SIZE)
    }

    /// Calculate the number of items preceding this page. Saturates.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.per_page
    }

    /// `OFFSET` bind value, clamped into PostgreSQL's `BIGINT` range.
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset()).unwrap_or(i64::MAX)
    }

    /// `LIMIT` bind value, clamped into PostgreSQL's `BIGINT` range.
    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.limit()).unwrap_or(i64::MAX)
    }

    /// Slice an already materialized, ordered result set.
    pub fn paginate<T>(&self, items: Vec<T>) -> PageResponse<T> {
        let total = items.len() as u64;
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let page_items = items
            .into_iter()
            .skip(offset)
            .take(usize::try_from(self.per_page).unwrap_or(usize::MAX))
            .collect();
        PageResponse::new(page_items, *self, total)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::page(1)
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Current page number (1-based).
    pub current_page: u64,
    /// Number of items per page.
    pub per_page: u64,
    /// Total number of items across all pages.
    pub total: u64,
    /// Number of the last page, `ceil(total / per_page)`.
    pub last_page: u64,
    /// 1-based index of the first item on this page.
    pub from: Option<u64>,
    /// 1-based index of the last item on this page.
    pub to: Option<u64>,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let last_page = total.div_ceil(request.per_page);
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let offset = request.offset();
            (
                Some(offset.saturating_add(1)),
                Some(offset.saturating_add(request.per_page).min(total)),
            )
        };
        Self {
            data,
            current_page: request.page,
            per_page: request.per_page,
            total,
            last_page,
            from,
            to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_below_one_is_clamped() {
        let req = PageRequest::page(0);
        assert_eq!(req.page, 1);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_paginate_slices_each_page() {
        let items: Vec<u32> = (0..23).collect();
        for k in 1..=4u64 {
            let page = PageRequest::page(k).paginate(items.clone());
            let start = ((k - 1) * 10) as usize;
            let end = (k * 10).min(23) as usize;
            let expected: Vec<u32> = items.get(start..end).map(<[u32]>::to_vec).unwrap_or_default();
            assert_eq!(page.data, expected, "page {k}");
            assert_eq!(page.total, 23);
            assert_eq!(page.last_page, 3);
        }
    }

    #[test]
    fn test_from_to_indices() {
        let items: Vec<u32> = (0..23).collect();
        let page = PageRequest::page(3).paginate(items);
        assert_eq!(page.from, Some(21));
        assert_eq!(page.to, Some(23));
    }

    #[test]
    fn test_empty_result() {
        let page = PageRequest::page(1).paginate(Vec::<u32>::new());
        assert_eq!(page.total, 0);
        assert_eq!(page.last_page, 0);
        assert_eq!(page.from, None);
        assert_eq!(page.to, None);
    }

    #[test]
    fn test_huge_page_number_saturates() {
        let req = PageRequest::page(u64::MAX);
        assert_eq!(req.offset(), u64::MAX);
        assert_eq!(req.sql_offset(), i64::MAX);
        assert_eq!(req.sql_limit(), 10);

        let page = PageRequest::page(i64::MAX as u64).paginate(vec![1, 2, 3]);
        assert!(page.data.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.last_page, 1);
        assert_eq!(page.from, None);
        assert_eq!(page.to, None);
    }

    #[test]
    fn test_from_to_saturate_on_large_offset() {
        let page = PageResponse::new(vec![1], PageRequest::page(u64::MAX), 5);
        assert_eq!(page.from, Some(u64::MAX));
        assert_eq!(page.to, Some(5));
    }

    #[test]
    fn test_exact_multiple_of_page_size() {
        let page = PageResponse::new(vec![1; 10], PageRequest::page(2), 20);
        assert_eq!(page.last_page, 2);
        assert_eq!(page.from, Some(11));
        assert_eq!(page.to, Some(20));
    }
}
