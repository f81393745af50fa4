//! Scripted fetch doubles shared by the controller tests.
//!
//! Every `load` call is parked until the test answers it, so tests decide
//! exactly when and in which order responses arrive.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use gallery_core::{
    ApiError, ArtObjectDetail, CancelToken, CollectionFetch, CollectionItem, DetailFetch,
};
use tokio::sync::{mpsc, oneshot, Mutex};
use url::Url;

const WAIT: Duration = Duration::from_secs(2);

/// A `load` call waiting for the test to answer it.
pub struct PendingLoad<T> {
    pub query: Option<String>,
    pub page: u32,
    pub id: String,
    pub cancel: CancelToken,
    respond: oneshot::Sender<Result<T, ApiError>>,
}

impl<T> PendingLoad<T> {
    pub fn succeed(self, value: T) {
        let _ = self.respond.send(Ok(value));
    }

    pub fn fail(self, error: ApiError) {
        let _ = self.respond.send(Err(error));
    }
}

pub struct Script<T> {
    calls: AtomicUsize,
    sender: mpsc::UnboundedSender<PendingLoad<T>>,
    receiver: Mutex<mpsc::UnboundedReceiver<PendingLoad<T>>>,
}

impl<T> Script<T> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            calls: AtomicUsize::new(0),
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The next parked call; panics if none arrives in time.
    pub async fn next_call(&self) -> PendingLoad<T> {
        let mut receiver = self.receiver.lock().await;
        tokio::time::timeout(WAIT, receiver.recv())
            .await
            .expect("timed out waiting for a load call")
            .expect("script closed")
    }

    /// Assert that no call arrives within a short grace period.
    pub async fn assert_no_call(&self) {
        let mut receiver = self.receiver.lock().await;
        let outcome = tokio::time::timeout(Duration::from_millis(100), receiver.recv()).await;
        assert!(outcome.is_err(), "unexpected load call");
    }

    async fn park(&self, query: Option<String>, page: u32, id: String, cancel: CancelToken) -> Result<T, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (respond, response) = oneshot::channel();
        let pending = PendingLoad {
            query,
            page,
            id,
            cancel,
            respond,
        };
        if self.sender.send(pending).is_err() {
            return Err(ApiError::network("script closed"));
        }
        response
            .await
            .unwrap_or_else(|_| Err(ApiError::network("call dropped unanswered")))
    }
}

pub type ScriptedCollection = Script<Vec<CollectionItem>>;
pub type ScriptedDetail = Script<ArtObjectDetail>;

#[async_trait]
impl CollectionFetch for Script<Vec<CollectionItem>> {
    async fn load(
        &self,
        query: Option<&str>,
        page: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<CollectionItem>, ApiError> {
        self.park(query.map(str::to_string), page, String::new(), cancel.clone())
            .await
    }
}

#[async_trait]
impl DetailFetch for Script<ArtObjectDetail> {
    async fn load(&self, id: &str, cancel: &CancelToken) -> Result<ArtObjectDetail, ApiError> {
        self.park(None, 0, id.to_string(), cancel.clone()).await
    }
}

/// Receive the next event; panics if none arrives in time.
pub async fn next_event<E>(events: &mut mpsc::UnboundedReceiver<E>) -> E {
    tokio::time::timeout(WAIT, events.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("event channel closed")
}

pub fn item(id: &str) -> CollectionItem {
    CollectionItem {
        id: id.to_string(),
        name: format!("Title of {id}"),
        section: format!("Maker of {id}"),
        image_url: Url::parse(&format!("https://images.example.org/{id}.jpg")).unwrap(),
    }
}

pub fn detail(id: &str) -> ArtObjectDetail {
    ArtObjectDetail {
        id: format!("en-{id}"),
        object_number: id.to_string(),
        title: Some(format!("Title of {id}")),
        web_image: None,
        description: None,
        principal_maker: Some("Johannes Vermeer".to_string()),
        dating: None,
        historical_persons: None,
    }
}
