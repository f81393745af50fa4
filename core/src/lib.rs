//! Paginated, cancellable fetch pipeline for an art-collection browser.
//!
//! # Overview
//! Builds typed requests against the collection API, executes them over a
//! pluggable HTTP transport, and drives two view-state controllers: the
//! overview (search + incremental paging) and the detail view of one object.
//! Controllers emit plain data events; rendering is left to the consumer.
//!
//! # Design
//! - `CollectionClient` is stateless: `build_*` methods produce
//!   `Request<R>` values tagged with the response type they decode into.
//! - `Executor` lowers a `Request` to plain `HttpRequest` data, hands it to
//!   an `HttpTransport`, and decodes the `HttpResponse`, so the I/O boundary
//!   stays explicit and swappable.
//! - Fetch services are traits, so controllers can be tested against
//!   scripted doubles.
//! - Controllers own their state on a dedicated task; superseded loads are
//!   cancelled cooperatively and their late results dropped.

pub mod cancel;
pub mod client;
pub mod config;
pub mod cursor;
pub mod detail;
pub mod error;
pub mod event;
pub mod executor;
pub mod gallery;
pub mod http;
pub mod model;
pub mod overview;
pub mod request;
pub mod service;
pub mod transport;
pub mod types;

pub use cancel::CancelToken;
pub use client::CollectionClient;
pub use config::{Config, ConfigError};
pub use cursor::PageCursor;
pub use detail::{DetailController, DetailEvent, DetailSnapshot};
pub use error::ApiError;
pub use event::{ErrorAlert, LoadMode, RetryAction};
pub use executor::{decode_response, Executor};
pub use gallery::{Gallery, Section};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use model::{collection_items, detail_rows, CollectionItem, DetailRow};
pub use overview::{OverviewController, OverviewEvent, OverviewSnapshot};
pub use request::{Method, Request};
pub use service::{CollectionFetch, DetailFetch, FetchCollectionService, FetchDetailService};
pub use transport::ReqwestTransport;
pub use types::{ArtObject, ArtObjectDetail, CollectionResponse, DetailResponse};
