use serde::{Deserialize, Serialize};

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// One-based index range of the rows on the current page, e.g. `(11, 20)`.
    pub fn row_range(&self) -> Option<(u64, u64)> {
        if self.total == 0 || self.page == 0 {
            return None;
        }
        let start = u64::from(self.page - 1) * u64::from(self.limit) + 1;
        if start > self.total {
            return None;
        }
        let end = (start + u64::from(self.limit) - 1).min(self.total);
        Some((start, end))
    }
}

/// Page numbers shown in a table footer: at most `width` pages centred on `current`.
pub fn page_window(current: u32, total_pages: u32, width: u32) -> Vec<u32> {
    if total_pages == 0 || width == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let width = width.min(total_pages);

    let mut start = current.saturating_sub(width / 2).max(1);
    let end = (start + width - 1).min(total_pages);
    start = end + 1 - width;

    (start..=end).collect()
}
