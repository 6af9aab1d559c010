//! Pagination
//!
//! Every listing query takes a [`Page`]; there is no unbounded `get_all`.

use serde::{Deserialize, Serialize};

/// Default number of rows per page
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Upper bound for `limit`
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Offset/limit window over an ordered listing
///
/// Deserializes from a query string (`?limit=10&offset=20`); missing
/// fields fall back to the defaults and `limit` is clamped on use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    limit: u32,
    offset: u32,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Effective row limit, always within `1..=MAX_PAGE_LIMIT`
    pub fn limit(&self) -> u32 {
        self.limit.clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// `LIMIT` bind value for SQL
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.limit())
    }

    /// `OFFSET` bind value for SQL
    pub fn sql_offset(&self) -> i64 {
        i64::from(self.offset)
    }

    /// Apply the window to an already ordered iterator
    pub fn slice<I: IntoIterator>(&self, items: I) -> Vec<I::Item> {
        items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit() as usize)
            .collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}
