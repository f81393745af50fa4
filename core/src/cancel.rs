//! Cooperative cancellation flag shared between a controller and its fetch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheap, cloneable cancellation flag.
///
/// Cancelling never interrupts work; code holding a clone checks
/// `is_cancelled` at the points where stopping early saves effort.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Tracks the single in-flight load of a controller.
///
/// Each `begin` supersedes the previous load: its token is cancelled and its
/// generation stops being current, so a late completion can be recognised
/// and dropped.
#[derive(Debug, Default)]
pub(crate) struct LoadSlot {
    generation: u64,
    in_flight: Option<CancelToken>,
}

impl LoadSlot {
    /// Start a new load, returning its generation and token.
    pub(crate) fn begin(&mut self) -> (u64, CancelToken) {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        self.generation += 1;
        let token = CancelToken::new();
        self.in_flight = Some(token.clone());
        (self.generation, token)
    }

    /// Accept the completion of `generation` if it is the current load.
    pub(crate) fn finish(&mut self, generation: u64) -> bool {
        if generation == self.generation && self.in_flight.is_some() {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Whether a retry issued for `generation` may still run: nothing newer
    /// has started and nothing is loading.
    pub(crate) fn accepts_retry(&self, generation: u64) -> bool {
        generation == self.generation && self.in_flight.is_none()
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}
