use serde::{Deserialize, Serialize};

/// Pagination configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    pub fn new() -> Self {
        Self {
            limit: None,
            offset: None,
        }
    }

    /// Zero-based page `index` of `size` rows
    pub fn page(index: u64, size: u64) -> Self {
        Self {
            limit: Some(size),
            offset: Some(index.saturating_mul(size)),
        }
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }
}
