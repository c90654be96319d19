//! Server pagination metadata
//!
//! Mirrors the Laravel length-aware paginator envelope. When a listing is
//! fetched without server pagination, [`fake_pagination`] synthesizes the
//! "everything on one page" shape so consumers can treat both cases alike.

use serde::{Deserialize, Serialize};

/// One entry of the paginator's `links` array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginationLink {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub active: bool,
}

/// Paginated listing envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination<T> {
    #[serde(default = "first_page")]
    pub current_page: u64,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub first_page_url: String,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default = "first_page")]
    pub last_page: u64,
    #[serde(default)]
    pub last_page_url: String,
    #[serde(default)]
    pub links: Vec<PaginationLink>,
    #[serde(default)]
    pub next_page_url: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub per_page: u64,
    #[serde(default)]
    pub prev_page_url: Option<String>,
    #[serde(default)]
    pub to: Option<u64>,
    #[serde(default)]
    pub total: u64,
}

fn first_page() -> u64 {
    1
}

impl<T> Pagination<T> {
    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page
    }
}

impl<T: Clone> Default for Pagination<T> {
    fn default() -> Self {
        fake_pagination(&[])
    }
}

/// Single-page envelope around `data`
pub fn fake_pagination<T: Clone>(data: &[T]) -> Pagination<T> {
    let len = data.len() as u64;
    Pagination {
        current_page: 1,
        data: data.to_vec(),
        first_page_url: String::new(),
        from: Some(0),
        last_page: 1,
        last_page_url: String::new(),
        links: Vec::new(),
        next_page_url: Some(String::new()),
        path: String::new(),
        per_page: len,
        prev_page_url: None,
        to: Some(len),
        total: len,
    }
}
