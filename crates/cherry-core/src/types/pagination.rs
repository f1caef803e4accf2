//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Default page size.
pub const DEFAULT_LIMIT: u64 = 10;
/// Maximum page size.
pub const MAX_LIMIT: u64 = 100;

/// Resolved pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
}

impl PageRequest {
    /// Create a new page request, clamping into the valid range.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Parse untrusted `page`/`limit` query values.
    ///
    /// Absent values take the defaults. Values that are not positive
    /// integers are rejected; a limit above [`MAX_LIMIT`] is clamped.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> AppResult<Self> {
        let page = parse_positive("page", page)?.unwrap_or(1);
        let limit = parse_positive("limit", limit)?.unwrap_or(DEFAULT_LIMIT);
        let request = Self::new(page, limit);
        let reachable = (request.page - 1)
            .checked_mul(request.limit)
            .is_some_and(|skip| i64::try_from(skip).is_ok());
        if !reachable {
            return Err(AppError::validation("Query parameter 'page' is out of range"));
        }
        Ok(request)
    }

    /// Number of rows to skip: `(page - 1) * limit`, capped at `i64::MAX`
    /// so it always binds as a non-negative SQL `OFFSET`.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn parse_positive(name: &str, value: Option<&str>) -> AppResult<Option<u64>> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        _ => Err(AppError::validation(format!(
            "Query parameter '{name}' must be a positive integer"
        ))),
    }
}

/// One page of results plus the totals needed to render pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total matching items before pagination.
    pub total: u64,
    /// Current page number (1-based).
    pub page: u64,
    /// Items per page.
    pub limit: u64,
    /// Total number of pages, `ceil(total / limit)`.
    pub pages: u64,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, request: &PageRequest, total: u64) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            pages: page_count(total, request.limit),
        }
    }

    /// Convert the items while keeping the pagination totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            pages: self.pages,
        }
    }
}

/// `ceil(total / limit)`, zero when there is nothing to page.
pub fn page_count(total: u64, limit: u64) -> u64 {
    if limit == 0 { 0 } else { total.div_ceil(limit) }
}
