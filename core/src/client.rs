//! Request builders for the collection API.
//!
//! # Design
//! `CollectionClient` holds the externally supplied API key, base URL and
//! culture, and carries no mutable state between calls. Its `build_*`
//! methods are pure: they produce typed `Request` values and never touch
//! the network. Executing them is the executor's job.

use crate::request::{Method, Request};
use crate::types::{CollectionResponse, DetailResponse};

/// Results per page when the caller does not choose.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size the API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

pub const DEFAULT_CULTURE: &str = "en";

/// Stateless builder of collection API requests.
#[derive(Debug, Clone)]
pub struct CollectionClient {
    base_url: String,
    api_key: String,
    culture: String,
}

impl CollectionClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            culture: DEFAULT_CULTURE.to_string(),
        }
    }

    pub fn with_culture(mut self, culture: &str) -> Self {
        self.culture = culture.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search the collection with the default page size.
    pub fn build_search(&self, query: Option<&str>, page: u32) -> Request<CollectionResponse> {
        self.build_search_with_page_size(query, page, DEFAULT_PAGE_SIZE)
    }

    /// Search the collection.
    ///
    /// `page` is 1-based. Passing `page == 0` or a `page_size` outside
    /// `1..=MAX_PAGE_SIZE` is a programming error and panics in debug builds.
    pub fn build_search_with_page_size(
        &self,
        query: Option<&str>,
        page: u32,
        page_size: u32,
    ) -> Request<CollectionResponse> {
        debug_assert!(page > 0, "page should be > 0");
        debug_assert!(
            (1..=MAX_PAGE_SIZE).contains(&page_size),
            "page_size should be between 1 and {MAX_PAGE_SIZE}"
        );

        let mut params = vec![
            param("imgonly", "true"),
            param("p", page.to_string()),
            param("ps", page_size.to_string()),
            param("s", "artist"),
            param("format", "json"),
            param("culture", self.culture.as_str()),
            param("key", self.api_key.as_str()),
        ];
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            params.push(param("q", query));
        }

        Request::new(Method::Get(params), format!("{}/collection", self.base_url))
    }

    /// Fetch one object by its object number.
    pub fn build_detail_fetch(&self, id: &str) -> Request<DetailResponse> {
        Request::new(
            Method::Get(vec![param("key", self.api_key.as_str()), param("format", "json")]),
            format!("{}/collection/{}", self.base_url, urlencoding::encode(id)),
        )
    }
}

fn param(name: &str, value: impl Into<String>) -> (String, String) {
    (name.to_string(), value.into())
}
