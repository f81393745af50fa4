//! Paging and search controller behind the overview listing.
//!
//! # Design
//! The controller state lives on its own tokio task and is only touched
//! from there: `OverviewController` is a handle that enqueues commands, and
//! fetches report back through the same queue tagged with the generation
//! they were launched under. That keeps every state transition sequential
//! without locks. A completion whose generation is no longer current
//! belongs to a superseded load and is dropped before it can emit anything,
//! so a slow page-1 response can never clobber a newer page.
//!
//! Events go out on a single channel returned from `spawn`.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::cancel::LoadSlot;
use crate::cursor::PageCursor;
use crate::error::ApiError;
use crate::event::{ErrorAlert, LoadMode, RetryAction};
use crate::model::CollectionItem;
use crate::service::CollectionFetch;

/// Title shown when browsing without a query.
pub const DEFAULT_TITLE: &str = "Rijksmuseum Collection";

/// Notifications emitted by an `OverviewController`.
#[derive(Debug)]
pub enum OverviewEvent {
    /// A page of items; `Overwrite` for page 1, `Append` afterwards.
    ItemBatch {
        mode: LoadMode,
        items: Vec<CollectionItem>,
    },
    /// `Some` to raise an alert, `None` to clear any alert still showing.
    ErrorAlert(Option<ErrorAlert>),
    LoadingChanged(bool),
    /// The user asked for the detail view of item `id`.
    ShowDetail { id: String },
}

/// Point-in-time view of the controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewSnapshot {
    pub title: String,
    pub query: Option<String>,
    /// `None` once the results are exhausted.
    pub next_page: Option<u32>,
    pub is_loading: bool,
}

enum Command {
    StartLoad,
    QueryChanged(Option<String>),
    ItemSelected(String),
    Retry {
        generation: u64,
    },
    Loaded {
        generation: u64,
        page: u32,
        result: Result<Vec<CollectionItem>, ApiError>,
    },
    Snapshot(oneshot::Sender<OverviewSnapshot>),
}

/// Handle to a running overview controller.
///
/// Dropping every handle stops the controller; a load still in flight then
/// finishes without effect.
pub struct OverviewController {
    commands: UnboundedSender<Command>,
    title: String,
}

impl OverviewController {
    /// Start a controller for `initial_query` and begin loading page 1.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        service: Arc<dyn CollectionFetch>,
        initial_query: Option<String>,
    ) -> (Self, UnboundedReceiver<OverviewEvent>) {
        let query = normalize(initial_query);
        let title = query.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let (commands, inbox) = mpsc::unbounded_channel();
        let (events, outbox) = mpsc::unbounded_channel();

        let state = OverviewState {
            service,
            events,
            commands: commands.downgrade(),
            title: title.clone(),
            query,
            cursor: PageCursor::first(),
            slot: LoadSlot::default(),
            is_loading: false,
        };
        tokio::spawn(state.run(inbox));

        (Self { commands, title }, outbox)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Load the next page, superseding any load in flight.
    ///
    /// Does nothing once the results are exhausted.
    pub fn start_load(&self) {
        self.send(Command::StartLoad);
    }

    /// The consumer has shown the last item it has; fetch more.
    pub fn on_reached_last_visible_item(&self) {
        self.start_load();
    }

    /// Restart paging for `query` unless it equals the current one.
    /// An empty query means no query.
    pub fn on_query_changed(&self, query: Option<String>) {
        self.send(Command::QueryChanged(query));
    }

    pub fn on_item_selected(&self, item: &CollectionItem) {
        self.send(Command::ItemSelected(item.id.clone()));
    }

    /// State after every previously issued call has been handled.
    ///
    /// Returns `None` if the controller task has stopped.
    pub async fn snapshot(&self) -> Option<OverviewSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot(reply));
        response.await.ok()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("overview controller is no longer running");
        }
    }
}

struct OverviewState {
    service: Arc<dyn CollectionFetch>,
    events: UnboundedSender<OverviewEvent>,
    commands: WeakUnboundedSender<Command>,
    title: String,
    query: Option<String>,
    cursor: PageCursor,
    slot: LoadSlot,
    is_loading: bool,
}

impl OverviewState {
    async fn run(mut self, mut inbox: UnboundedReceiver<Command>) {
        self.start_load();
        while let Some(command) = inbox.recv().await {
            self.handle(command);
        }
        debug!(title = %self.title, "overview controller stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::StartLoad => self.start_load(),
            Command::QueryChanged(query) => self.change_query(query),
            Command::ItemSelected(id) => self.emit(OverviewEvent::ShowDetail { id }),
            Command::Retry { generation } => {
                if self.slot.accepts_retry(generation) {
                    debug!(query = ?self.query, page = ?self.cursor.next_page(), "retrying load");
                    self.start_load();
                } else {
                    debug!(generation, current = self.slot.generation(), "ignoring stale retry");
                }
            }
            Command::Loaded {
                generation,
                page,
                result,
            } => self.finish_load(generation, page, result),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    fn start_load(&mut self) {
        let Some(page) = self.cursor.next_page() else {
            debug!(query = ?self.query, "results exhausted, not loading");
            return;
        };

        let (generation, cancel) = self.slot.begin();
        self.set_loading(true);
        debug!(query = ?self.query, page, generation, "starting load");

        let service = Arc::clone(&self.service);
        let query = self.query.clone();
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let result = service.load(query.as_deref(), page, &cancel).await;
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(Command::Loaded {
                    generation,
                    page,
                    result,
                });
            }
        });
    }

    fn change_query(&mut self, query: Option<String>) {
        let query = normalize(query);
        if query == self.query {
            trace!(?query, "query unchanged");
            return;
        }
        debug!(from = ?self.query, to = ?query, "query changed");
        self.cursor = PageCursor::first();
        self.query = query;
        self.start_load();
    }

    fn finish_load(
        &mut self,
        generation: u64,
        page: u32,
        result: Result<Vec<CollectionItem>, ApiError>,
    ) {
        if !self.slot.finish(generation) {
            trace!(generation, page, "dropping result of superseded load");
            return;
        }

        match result {
            Ok(items) => {
                debug!(page, count = items.len(), "page loaded");
                self.emit(OverviewEvent::ErrorAlert(None));
                self.cursor = PageCursor::after(page, items.is_empty());
                self.emit(OverviewEvent::ItemBatch {
                    mode: LoadMode::for_page(page),
                    items,
                });
            }
            Err(error) if error.is_cancelled() => {
                trace!(page, "load cancelled");
            }
            Err(error) => {
                warn!(query = ?self.query, page, %error, "load failed");
                let alert = ErrorAlert::for_error(&error, self.retry_action(generation));
                self.emit(OverviewEvent::ErrorAlert(Some(alert)));
            }
        }
        self.set_loading(false);
    }

    fn retry_action(&self, generation: u64) -> RetryAction {
        let commands = self.commands.clone();
        RetryAction::new(move || {
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(Command::Retry { generation });
            }
        })
    }

    fn set_loading(&mut self, loading: bool) {
        if self.is_loading != loading {
            self.is_loading = loading;
            self.emit(OverviewEvent::LoadingChanged(loading));
        }
    }

    fn emit(&self, event: OverviewEvent) {
        if self.events.send(event).is_err() {
            trace!("overview event dropped, no subscriber");
        }
    }

    fn snapshot(&self) -> OverviewSnapshot {
        OverviewSnapshot {
            title: self.title.clone(),
            query: self.query.clone(),
            next_page: self.cursor.next_page(),
            is_loading: self.is_loading,
        }
    }
}

fn normalize(query: Option<String>) -> Option<String> {
    query.filter(|q| !q.is_empty())
}
