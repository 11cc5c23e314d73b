//! Pagination query parameters. Zero-indexed `page`, `size` clamped to
//! [1, MAX_PAGE_SIZE].

use serde::Deserialize;

use crate::repository::PageRequest;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageQuery {
    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn page_size(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page_number(), self.page_size())
    }
}

/// Query for the flat item listing: pagination plus an optional category
/// filter.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ItemListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<i64>,
}

impl ItemListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageQuery {
            page: self.page,
            size: self.size,
        }
        .page_request()
    }
}
