//! Wire DTOs for the collection API.
//!
//! # Design
//! These mirror the JSON the API sends and are deliberately permissive:
//! almost every field is optional, and unknown fields are ignored. Turning
//! them into something the rest of the crate can rely on happens in `model`.
//! The mock-server crate defines its own copies; the end-to-end tests catch
//! schema drift between the two.

use serde::{Deserialize, Serialize};

/// Body of a search response (`GET /collection`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
    pub count: u64,
    pub art_objects: Vec<ArtObject>,
}

/// One entry of a search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtObject {
    pub id: String,
    pub object_number: String,
    pub title: Option<String>,
    pub principal_or_first_maker: Option<String>,
    pub web_image: Option<WebImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebImage {
    pub url: Option<String>,
}

/// Body of a single-object response (`GET /collection/{objectNumber}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
    pub art_object: ArtObjectDetail,
}

/// The full record of one collection object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtObjectDetail {
    pub id: String,
    pub object_number: String,
    pub title: Option<String>,
    pub web_image: Option<DetailWebImage>,
    pub description: Option<String>,
    pub principal_maker: Option<String>,
    pub dating: Option<Dating>,
    pub historical_persons: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetailWebImage {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dating {
    pub presenting_date: Option<String>,
}
