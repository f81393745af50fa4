//! Error types for the collection API pipeline.
//!
//! # Design
//! Four outcomes matter to callers: the request could not be built, the
//! network failed, the server answered with something that is not a usable
//! body (bad status or undecodable JSON), or the call was superseded.
//! `Cancelled` is never shown to a user; every other variant ends up as the
//! message of an error alert.

use thiserror::Error;

/// Boxed cause carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by the executor and the fetch services built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The URL or query string could not be constructed. Raised before any I/O.
    #[error("could not create a request to send to the network: {0}")]
    CouldNotBuildRequest(String),

    /// Connectivity or transport failure.
    #[error("network request failed: {0}")]
    NetworkFailed(#[source] BoxError),

    /// The server answered with a non-2xx status.
    #[error("server responded with HTTP {status}")]
    UnexpectedStatus { status: u16 },

    /// The body did not match the expected response shape.
    #[error("could not read the server response: {0}")]
    DecodingFailed(#[source] serde_json::Error),

    /// The request was superseded before its result was used.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn network(cause: impl Into<BoxError>) -> Self {
        ApiError::NetworkFailed(cause.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_wraps_string_causes() {
        let err = ApiError::network("connection reset");
        assert_eq!(err.to_string(), "network request failed: connection reset");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn only_cancelled_reports_cancelled() {
        assert!(ApiError::Cancelled.is_cancelled());
        assert!(!ApiError::UnexpectedStatus { status: 500 }.is_cancelled());
        assert!(!ApiError::CouldNotBuildRequest("bad".into()).is_cancelled());
    }
}
