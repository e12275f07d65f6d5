//! PageRequest - Pagination selector for list reads
//!
//! Both fields are optional. An absent page or limit means "not provided",
//! which is distinct from any explicit value when building cache keys.

/// 1-based pagination request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// No pagination: the whole listing
    pub fn all() -> Self {
        Self::default()
    }

    /// Number of records skipped before this page
    ///
    /// A page without a limit cannot be positioned, so only the
    /// limit-bearing case skips anything.
    pub fn offset(&self) -> usize {
        match (self.page, self.limit) {
            (Some(page), Some(limit)) => (page.saturating_sub(1) as usize) * limit as usize,
            _ => 0,
        }
    }

    /// Slice an already filtered and ordered listing
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = self.offset();
        let iter = items.into_iter().skip(offset);
        match self.limit {
            Some(limit) => iter.take(limit as usize).collect(),
            None => iter.collect(),
        }
    }
}
