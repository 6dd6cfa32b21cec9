use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;

/// Raw `?page=&limit=` values; anything unparsable falls back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn from_params(params: &PageParams, api: &ApiConfig) -> Self {
        let page = positive(params.page.as_deref()).unwrap_or(1);
        let limit = positive(params.limit.as_deref())
            .unwrap_or(api.default_page_size)
            .min(api.max_page_size);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

fn positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|v| v.trim().parse::<u32>().ok()).filter(|v| *v > 0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_books: i64,
    pub total_pages: i64,
    pub current_page: u32,
    pub limit: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    pub fn new(total: i64, request: PageRequest) -> Self {
        let limit = request.limit.max(1) as i64;
        let total_pages = (total + limit - 1) / limit;
        Self {
            total_books: total,
            total_pages,
            current_page: request.page,
            limit: request.limit,
            has_next_page: (request.page as i64) < total_pages,
            has_previous_page: request.page > 1,
        }
    }

    /// Matches exist but the requested page lies past the last one.
    pub fn is_out_of_range(&self) -> bool {
        self.total_books > 0 && self.current_page as i64 > self.total_pages
    }
}
