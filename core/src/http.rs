//! HTTP transport types and the transport capability.
//!
//! # Design
//! `HttpRequest` and `HttpResponse` describe a round-trip as plain data. The
//! core builds requests from typed `Request<R>` values and hands them to an
//! `HttpTransport`; the transport performs the actual I/O and reports back an
//! `HttpResponse`. Status interpretation and JSON decoding stay in the core
//! (see `executor`), so a transport is nothing more than "send these bytes".
//!
//! All fields use owned types so values can move freely onto background
//! tasks.

use async_trait::async_trait;

use crate::error::ApiError;

/// HTTP verb of a transport-level request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the encoded query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The generic HTTP capability the executor sends requests through.
///
/// Implementations report connectivity problems as `ApiError::NetworkFailed`
/// and must return non-2xx responses as data rather than errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, headers: &[(&str, &str)]) -> HttpResponse {
        HttpResponse {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: Vec::new(),
        }
    }

    #[test]
    fn success_is_2xx() {
        assert!(response(200, &[]).is_success());
        assert!(response(204, &[]).is_success());
        assert!(!response(304, &[]).is_success());
        assert!(!response(404, &[]).is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let resp = response(200, &[("Content-Type", "application/json"), ("content-type", "text/plain")]);
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(resp.header("etag"), None);
    }
}
