//! Executes typed requests over an `HttpTransport`.
//!
//! # Design
//! `resolve` is split the same way the rest of the crate is: the `Request`
//! is lowered to plain `HttpRequest` data, the transport performs the I/O on
//! a spawned background task, and `decode_response` turns the plain
//! `HttpResponse` back into a typed value. The cancellation token is checked
//! between I/O and decoding so a superseded request never pays for a decode.

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::cancel::CancelToken;
use crate::error::ApiError;
use crate::http::{HttpResponse, HttpTransport};
use crate::request::Request;

/// Sends `Request<R>` values and decodes their `R` responses.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn HttpTransport>,
}

impl Executor {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Resolve `request` into its decoded response.
    ///
    /// Must be called from within a tokio runtime. Never retries.
    pub async fn resolve<R>(&self, request: &Request<R>, cancel: &CancelToken) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let http_request = request.to_http_request()?;
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let method = http_request.method.as_str();
        let target = redact_api_key(&http_request.url);
        debug!(method, url = %target, "sending request");

        let started = Instant::now();
        let transport = Arc::clone(&self.transport);
        let response = tokio::spawn(async move { transport.send(http_request).await })
            .await
            .map_err(ApiError::network)??;

        if cancel.is_cancelled() {
            debug!(method, url = %target, "request superseded, skipping decode");
            return Err(ApiError::Cancelled);
        }
        debug!(
            method,
            url = %target,
            status = response.status,
            content_type = response.header("content-type").unwrap_or("-"),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response received"
        );
        decode_response(response)
    }
}

/// Check the status of `response` and decode its JSON body.
pub fn decode_response<R: DeserializeOwned>(response: HttpResponse) -> Result<R, ApiError> {
    if !response.is_success() {
        return Err(ApiError::UnexpectedStatus {
            status: response.status,
        });
    }
    serde_json::from_slice(&response.body).map_err(ApiError::DecodingFailed)
}

/// Mask the `key` query parameter so API keys stay out of logs.
pub(crate) fn redact_api_key(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    if !url.query_pairs().any(|(name, _)| name == "key") {
        return raw.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "key" { "***".into() } else { value.into_owned() };
            (name.into_owned(), value)
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(&pairs);
    url.into()
}
