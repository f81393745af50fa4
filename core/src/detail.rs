//! Controller behind the detail view of a single object.
//!
//! Same shape as the overview controller: a handle enqueues commands for a
//! task that owns the state, and completions of superseded loads are dropped.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::cancel::LoadSlot;
use crate::error::ApiError;
use crate::event::{ErrorAlert, RetryAction};
use crate::model::{detail_rows, DetailRow};
use crate::service::DetailFetch;
use crate::types::ArtObjectDetail;

/// Notifications emitted by a `DetailController`.
#[derive(Debug)]
pub enum DetailEvent {
    Rows(Vec<DetailRow>),
    ErrorAlert(Option<ErrorAlert>),
    LoadingChanged(bool),
    /// The user asked to search the collection for `query`.
    SearchFor { query: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSnapshot {
    /// Object of the most recent `load`.
    pub id: String,
    pub is_loading: bool,
}

enum Command {
    Load(String),
    Retry {
        generation: u64,
        id: String,
    },
    Loaded {
        generation: u64,
        id: String,
        result: Result<ArtObjectDetail, ApiError>,
    },
    RowActivated(DetailRow),
    Snapshot(oneshot::Sender<DetailSnapshot>),
}

/// Handle to a running detail controller.
pub struct DetailController {
    commands: UnboundedSender<Command>,
}

impl DetailController {
    /// Start a controller and load object `id`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        service: Arc<dyn DetailFetch>,
        id: impl Into<String>,
    ) -> (Self, UnboundedReceiver<DetailEvent>) {
        let id = id.into();
        let (commands, inbox) = mpsc::unbounded_channel();
        let (events, outbox) = mpsc::unbounded_channel();

        let state = DetailState {
            service,
            events,
            commands: commands.downgrade(),
            id: id.clone(),
            slot: LoadSlot::default(),
            is_loading: false,
        };
        tokio::spawn(state.run(inbox));

        let controller = Self { commands };
        controller.load(id);
        (controller, outbox)
    }

    /// Load object `id`, superseding any load in flight.
    pub fn load(&self, id: impl Into<String>) {
        self.send(Command::Load(id.into()));
    }

    /// Request a follow-up search for `row`'s value. Ignored for rows that
    /// do not allow searching.
    pub fn on_row_activated(&self, row: &DetailRow) {
        self.send(Command::RowActivated(row.clone()));
    }

    pub async fn snapshot(&self) -> Option<DetailSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot(reply));
        response.await.ok()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("detail controller is no longer running");
        }
    }
}

struct DetailState {
    service: Arc<dyn DetailFetch>,
    events: UnboundedSender<DetailEvent>,
    commands: WeakUnboundedSender<Command>,
    id: String,
    slot: LoadSlot,
    is_loading: bool,
}

impl DetailState {
    async fn run(mut self, mut inbox: UnboundedReceiver<Command>) {
        while let Some(command) = inbox.recv().await {
            self.handle(command);
        }
        debug!(id = %self.id, "detail controller stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Load(id) => self.load(id),
            Command::Retry { generation, id } => {
                if self.slot.accepts_retry(generation) {
                    debug!(%id, "retrying load");
                    self.load(id);
                } else {
                    debug!(%id, generation, "ignoring stale retry");
                }
            }
            Command::Loaded {
                generation,
                id,
                result,
            } => self.finish_load(generation, id, result),
            Command::RowActivated(row) => {
                if row.allows_search {
                    self.emit(DetailEvent::SearchFor { query: row.value });
                } else {
                    trace!(label = %row.label, "row does not allow search");
                }
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(DetailSnapshot {
                    id: self.id.clone(),
                    is_loading: self.is_loading,
                });
            }
        }
    }

    fn load(&mut self, id: String) {
        let (generation, cancel) = self.slot.begin();
        self.id = id.clone();
        self.set_loading(true);
        debug!(%id, generation, "loading detail");

        let service = Arc::clone(&self.service);
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let result = service.load(&id, &cancel).await;
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(Command::Loaded {
                    generation,
                    id,
                    result,
                });
            }
        });
    }

    fn finish_load(&mut self, generation: u64, id: String, result: Result<ArtObjectDetail, ApiError>) {
        if !self.slot.finish(generation) {
            trace!(%id, generation, "dropping result of superseded load");
            return;
        }

        match result {
            Ok(object) => {
                self.emit(DetailEvent::ErrorAlert(None));
                self.emit(DetailEvent::Rows(detail_rows(&object)));
            }
            Err(error) if error.is_cancelled() => {
                trace!(%id, "load cancelled");
            }
            Err(error) => {
                warn!(%id, %error, "detail load failed");
                let retry = self.retry_action(generation, id);
                self.emit(DetailEvent::ErrorAlert(Some(ErrorAlert::for_error(&error, retry))));
            }
        }
        self.set_loading(false);
    }

    fn retry_action(&self, generation: u64, id: String) -> RetryAction {
        let commands = self.commands.clone();
        RetryAction::new(move || {
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(Command::Retry {
                    generation,
                    id: id.clone(),
                });
            }
        })
    }

    fn set_loading(&mut self, loading: bool) {
        if self.is_loading != loading {
            self.is_loading = loading;
            self.emit(DetailEvent::LoadingChanged(loading));
        }
    }

    fn emit(&self, event: DetailEvent) {
        if self.events.send(event).is_err() {
            trace!("detail event dropped, no subscriber");
        }
    }
}
