// Path: crates/types/src/app/query.rs

use serde::{Deserialize, Serialize};

/// The page size used when a request does not set one.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;
/// The largest page size a request may ask for.
pub const MAX_PAGE_LIMIT: u64 = 1000;

/// Offset pagination for list queries.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    /// Number of entries to skip.
    #[serde(default)]
    pub offset: u64,
    /// Maximum entries to return; zero means the default.
    #[serde(default)]
    pub limit: u64,
    /// Whether to count every matching entry.
    #[serde(default)]
    pub count_total: bool,
}

impl PageRequest {
    /// The effective page size, clamped to `[1, MAX_PAGE_LIMIT]`.
    pub fn effective_limit(&self) -> u64 {
        match self.limit {
            0 => DEFAULT_PAGE_LIMIT,
            n => n.min(MAX_PAGE_LIMIT),
        }
    }
}

/// Pagination metadata returned alongside a page.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageResponse {
    /// The offset of the next page, if more entries exist.
    pub next_offset: Option<u64>,
    /// The total number of entries, when requested.
    pub total: Option<u64>,
}

/// A page of results.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// The entries in key order.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub pagination: PageResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(PageRequest::default().effective_limit(), DEFAULT_PAGE_LIMIT);
        let big = PageRequest {
            limit: 50_000,
            ..Default::default()
        };
        assert_eq!(big.effective_limit(), MAX_PAGE_LIMIT);
        let small = PageRequest {
            limit: 3,
            ..Default::default()
        };
        assert_eq!(small.effective_limit(), 3);
    }
}
