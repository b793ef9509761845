//! Pagination engine for catalog listings.
//!
//! Cursor pagination is the canonical wire strategy: pages are anchored to
//! the last-seen id instead of a positional offset, so concurrent inserts
//! and deletes cannot skip or duplicate rows between pages. The offset
//! strategy is retained with identical `per_page` validation for callers
//! that need totals.

use std::collections::HashMap;

use lectern_http::error::ApiError;
use serde::Serialize;

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MIN_PER_PAGE: i64 = 1;
pub const MAX_PER_PAGE: i64 = 100;

const MSG_PER_PAGE: &str = "Items per page must be between 1 and 100";
const MSG_PAGE: &str = "Page number must be positive";

/// Validated cursor-mode parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorParams {
    pub cursor: Option<i64>,
    pub per_page: i64,
}

impl CursorParams {
    /// Parse and validate cursor parameters from a raw query map.
    ///
    /// Values that fail integer decoding are treated as absent, matching the
    /// transport rule for query parameters. Bounds are checked before any
    /// store access.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, ApiError> {
        let cursor = int_param(query, "cursor");
        let per_page = int_param(query, "per_page").unwrap_or(DEFAULT_PER_PAGE);

        if !(MIN_PER_PAGE..=MAX_PER_PAGE).contains(&per_page) {
            return Err(ApiError::invalid_parameter(MSG_PER_PAGE));
        }

        Ok(Self { cursor, per_page })
    }

    /// How many rows to request from the store: one extra row tells us
    /// whether a further page exists.
    pub fn fetch_limit(&self) -> i64 {
        self.per_page + 1
    }

    /// Assemble a page from rows fetched with [`fetch_limit`](Self::fetch_limit),
    /// already ordered by id descending.
    pub fn paginate<T>(&self, mut rows: Vec<T>, id_of: impl Fn(&T) -> i64) -> CursorPage<T> {
        let has_more = rows.len() as i64 > self.per_page;
        if has_more {
            rows.truncate(self.per_page as usize);
        }
        let next_cursor = rows.last().map(id_of);
        CursorPage {
            items: rows,
            next_cursor,
            has_more,
        }
    }
}

/// One page of a cursor-mode listing.
#[derive(Debug, Serialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<i64>,
    pub has_more: bool,
}

impl<T> CursorPage<T> {
    /// Map the page items, keeping continuation metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CursorPage<U> {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

/// Validated offset-mode parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetParams {
    pub page: i64,
    pub per_page: i64,
}

impl OffsetParams {
    /// Parse and validate offset parameters from a raw query map.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, ApiError> {
        let page = int_param(query, "page").unwrap_or(1);
        let per_page = int_param(query, "per_page").unwrap_or(DEFAULT_PER_PAGE);

        if page < 1 {
            return Err(ApiError::invalid_parameter(MSG_PAGE));
        }
        if !(MIN_PER_PAGE..=MAX_PER_PAGE).contains(&per_page) {
            return Err(ApiError::invalid_parameter(MSG_PER_PAGE));
        }

        Ok(Self { page, per_page })
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// Assemble a page from the rows of the current page and the total count.
    pub fn paginate<T>(&self, items: Vec<T>, total: u64) -> OffsetPage<T> {
        OffsetPage {
            items,
            total,
            page: self.page,
            per_page: self.per_page,
            pages: total.div_ceil(self.per_page as u64),
        }
    }
}

/// One page of an offset-mode listing.
#[derive(Debug, Serialize)]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: i64,
    pub per_page: i64,
    pub pages: u64,
}

fn int_param(query: &HashMap<String, String>, key: &str) -> Option<i64> {
    query.get(key).and_then(|raw| raw.parse().ok())
}
