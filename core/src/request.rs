//! Typed request descriptions.
//!
//! A `Request<R>` names an endpoint and a method, and is tagged with the
//! response shape `R` the executor decodes the body into. The tag is purely
//! a type-level marker; no `R` value is ever stored.

use std::fmt;
use std::marker::PhantomData;

use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};

/// Method of an outbound call together with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET with query parameters, in the order they are sent.
    Get(Vec<(String, String)>),
    /// POST with an optional JSON body.
    Post(Option<Vec<u8>>),
}

impl Method {
    pub fn verb(&self) -> HttpMethod {
        match self {
            Method::Get(_) => HttpMethod::Get,
            Method::Post(_) => HttpMethod::Post,
        }
    }
}

/// An outbound call expected to answer with a JSON-encoded `R`.
pub struct Request<R> {
    pub method: Method,
    pub url: String,
    response: PhantomData<fn() -> R>,
}

impl<R> Request<R> {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            response: PhantomData,
        }
    }

    /// Query parameters of a GET request; empty for POST.
    pub fn query(&self) -> &[(String, String)] {
        match &self.method {
            Method::Get(params) => params,
            Method::Post(_) => &[],
        }
    }

    /// Lower this request to a transport-level `HttpRequest`.
    ///
    /// Fails with `CouldNotBuildRequest` when `url` is not an absolute
    /// http(s) URL.
    pub fn to_http_request(&self) -> Result<HttpRequest, ApiError> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| ApiError::CouldNotBuildRequest(format!("{e}: {}", self.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::CouldNotBuildRequest(format!(
                "unsupported scheme `{}` in {}",
                url.scheme(),
                self.url
            )));
        }

        let accept = ("accept".to_string(), "application/json".to_string());
        let request = match &self.method {
            Method::Get(params) => {
                if !params.is_empty() {
                    url.query_pairs_mut().extend_pairs(params);
                }
                HttpRequest {
                    method: HttpMethod::Get,
                    url: url.into(),
                    headers: vec![accept],
                    body: None,
                }
            }
            Method::Post(body) => {
                let mut headers = vec![accept];
                if body.is_some() {
                    headers.push(("content-type".to_string(), "application/json".to_string()));
                }
                HttpRequest {
                    method: HttpMethod::Post,
                    url: url.into(),
                    headers,
                    body: body.clone(),
                }
            }
        };
        Ok(request)
    }
}

impl<R> Clone for Request<R> {
    fn clone(&self) -> Self {
        Self::new(self.method.clone(), self.url.clone())
    }
}

impl<R> fmt::Debug for Request<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("response", &std::any::type_name::<R>())
            .finish()
    }
}
