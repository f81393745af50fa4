//! Event payloads shared by the controllers.

use std::fmt;
use std::sync::Arc;

use crate::error::ApiError;

/// How an item batch relates to what the consumer already shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Replace the current list (first page of a query).
    Overwrite,
    /// Extend the current list (any later page).
    Append,
}

impl LoadMode {
    pub fn for_page(page: u32) -> Self {
        if page == 1 {
            LoadMode::Overwrite
        } else {
            LoadMode::Append
        }
    }
}

/// Re-issues the load an alert was raised for.
///
/// Retrying is best effort: once the controller has moved on (a newer load
/// started, or the controller is gone) the action does nothing.
#[derive(Clone)]
pub struct RetryAction(Arc<dyn Fn() + Send + Sync>);

impl RetryAction {
    pub fn new(action: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(action))
    }

    pub fn run(&self) {
        (self.0)()
    }
}

impl fmt::Debug for RetryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RetryAction")
    }
}

/// A dismissible, user-facing failure notice.
#[derive(Debug, Clone)]
pub struct ErrorAlert {
    pub title: String,
    pub message: String,
    retry: RetryAction,
}

impl ErrorAlert {
    pub const TITLE: &'static str = "Error";

    pub fn new(title: impl Into<String>, message: impl Into<String>, retry: RetryAction) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            retry,
        }
    }

    pub(crate) fn for_error(error: &ApiError, retry: RetryAction) -> Self {
        Self::new(Self::TITLE, error.to_string(), retry)
    }

    pub fn retry(&self) {
        self.retry.run();
    }
}
