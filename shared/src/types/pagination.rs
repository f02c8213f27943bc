//! Pagination related types for list endpoints

use serde::{Deserialize, Serialize};

/// Pagination parameters for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageParams {
    /// Current page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Number of items per page
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_limit: default_page_limit(),
        }
    }
}

impl PageParams {
    /// Create pagination parameters with sanitized values
    pub fn new(page: u32, page_limit: u32) -> Self {
        Self {
            page: page.max(1),
            page_limit: page_limit.clamp(MIN_PAGE_LIMIT, MAX_PAGE_LIMIT),
        }
    }

    /// Number of records to skip: `(page - 1) * page_limit`
    pub fn skip(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * (self.page_limit as usize)
    }

    /// Maximum number of records to return
    pub fn limit(&self) -> usize {
        self.page_limit as usize
    }
}

/// Pagination descriptor returned alongside list results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Current page number
    pub page: u32,

    /// Items per page
    pub page_limit: u32,

    /// Total number of matching records
    pub total_count: u64,

    /// Total number of pages: `ceil(total_count / page_limit)`
    pub total_pages: u32,
}

impl PageInfo {
    /// Compute the descriptor for a page over `total_count` records
    pub fn new(params: &PageParams, total_count: u64) -> Self {
        Self {
            page: params.page,
            page_limit: params.page_limit,
            total_count,
            total_pages: Self::total_pages_for(total_count, params.page_limit),
        }
    }

    fn total_pages_for(total_count: u64, page_limit: u32) -> u32 {
        if total_count == 0 {
            return 0;
        }
        total_count.div_ceil(page_limit as u64) as u32
    }
}

// Constants
const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_LIMIT: u32 = 20;
const MIN_PAGE_LIMIT: u32 = 1;
const MAX_PAGE_LIMIT: u32 = 100;

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}
