use crate::models::Slice;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// A normalized page request: `page >= 1` and `limit >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Missing or non-positive values fall back to the defaults.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(page) if page >= 1 => u32::try_from(page).unwrap_or(u32::MAX),
            _ => DEFAULT_PAGE,
        };

        let limit = match limit {
            Some(limit) if limit >= 1 => u32::try_from(limit).unwrap_or(u32::MAX),
            _ => DEFAULT_LIMIT,
        };

        Self { page, limit }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// One record more than the page holds, so a following page can be detected
    /// without counting.
    pub fn fetch_slice(&self) -> Slice {
        Slice::new(self.offset(), u64::from(self.limit) + 1)
    }
}
