//! Fetch services: one typed request, one executor round-trip.
//!
//! Services are stateless and shared by reference between controllers. The
//! traits exist so controllers can be driven by test doubles.

use async_trait::async_trait;

use crate::cancel::CancelToken;
use crate::client::{CollectionClient, DEFAULT_PAGE_SIZE};
use crate::error::ApiError;
use crate::executor::Executor;
use crate::model::{collection_items, CollectionItem};
use crate::types::ArtObjectDetail;

/// Loads one page of search results.
#[async_trait]
pub trait CollectionFetch: Send + Sync {
    /// Fetch `page` (1-based) of the results for `query`.
    ///
    /// Entries missing a required field are dropped, so a page may come back
    /// shorter than the page size, or empty.
    async fn load(
        &self,
        query: Option<&str>,
        page: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<CollectionItem>, ApiError>;
}

/// Loads the full record of one object.
#[async_trait]
pub trait DetailFetch: Send + Sync {
    async fn load(&self, id: &str, cancel: &CancelToken) -> Result<ArtObjectDetail, ApiError>;
}

pub struct FetchCollectionService {
    executor: Executor,
    client: CollectionClient,
    page_size: u32,
}

impl FetchCollectionService {
    pub fn new(executor: Executor, client: CollectionClient) -> Self {
        Self {
            executor,
            client,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

#[async_trait]
impl CollectionFetch for FetchCollectionService {
    async fn load(
        &self,
        query: Option<&str>,
        page: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<CollectionItem>, ApiError> {
        let request = self
            .client
            .build_search_with_page_size(query, page, self.page_size);
        let response = self.executor.resolve(&request, cancel).await?;
        Ok(collection_items(&response.art_objects))
    }
}

pub struct FetchDetailService {
    executor: Executor,
    client: CollectionClient,
}

impl FetchDetailService {
    pub fn new(executor: Executor, client: CollectionClient) -> Self {
        Self { executor, client }
    }
}

#[async_trait]
impl DetailFetch for FetchDetailService {
    async fn load(&self, id: &str, cancel: &CancelToken) -> Result<ArtObjectDetail, ApiError> {
        let request = self.client.build_detail_fetch(id);
        let response = self.executor.resolve(&request, cancel).await?;
        Ok(response.art_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::http::{HttpRequest, HttpResponse, HttpTransport};

    struct RecordingTransport {
        body: &'static str,
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpTransport for RecordingTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.urls.lock().unwrap().push(request.url);
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    fn transport(body: &'static str) -> Arc<RecordingTransport> {
        Arc::new(RecordingTransport {
            body,
            urls: Mutex::new(Vec::new()),
        })
    }

    fn client() -> CollectionClient {
        CollectionClient::new("http://localhost:3000/api/en", "k")
    }

    #[tokio::test]
    async fn collection_load_filters_incomplete_records() {
        let transport = transport(
            r#"{"count": 2, "artObjects": [
                {"id": "en-A", "objectNumber": "A", "title": "Kept", "principalOrFirstMaker": "M",
                 "webImage": {"url": "https://images.example.org/a.jpg"}},
                {"id": "en-B", "objectNumber": "B", "title": "No maker",
                 "webImage": {"url": "https://images.example.org/b.jpg"}}
            ]}"#,
        );
        let service = FetchCollectionService::new(Executor::new(transport.clone()), client())
            .with_page_size(5);
        let items = service.load(Some("x"), 2, &CancelToken::new()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "A");

        let urls = transport.urls.lock().unwrap();
        assert!(urls[0].contains("p=2"));
        assert!(urls[0].contains("ps=5"));
        assert!(urls[0].contains("q=x"));
    }

    #[tokio::test]
    async fn detail_load_returns_art_object() {
        let transport = transport(r#"{"artObject": {"id": "en-A", "objectNumber": "A", "title": "T"}}"#);
        let service = FetchDetailService::new(Executor::new(transport.clone()), client());
        let object = service.load("A", &CancelToken::new()).await.unwrap();
        assert_eq!(object.object_number, "A");
        assert_eq!(object.title.as_deref(), Some("T"));
        assert_eq!(
            transport.urls.lock().unwrap()[0],
            "http://localhost:3000/api/en/collection/A?key=k&format=json"
        );
    }
}
