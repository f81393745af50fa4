use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Page size used when a search does not pass `ps`.
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// One object in the served catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artwork {
    pub object_number: String,
    pub title: Option<String>,
    pub maker: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub presenting_date: Option<String>,
    pub historical_persons: Vec<String>,
}

impl Artwork {
    pub fn new(object_number: &str, title: &str, maker: &str) -> Self {
        Self {
            object_number: object_number.to_string(),
            title: Some(title.to_string()),
            maker: Some(maker.to_string()),
            image_url: Some(format!("https://images.example.org/{object_number}.jpg")),
            description: None,
            presenting_date: None,
            historical_persons: Vec::new(),
        }
    }

    fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.title, &self.maker]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPage {
    pub count: usize,
    pub art_objects: Vec<SearchEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub id: String,
    pub object_number: String,
    pub title: Option<String>,
    pub principal_or_first_maker: Option<String>,
    pub has_image: bool,
    pub web_image: Option<Image>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPage {
    pub art_object: ObjectEntry,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    pub id: String,
    pub object_number: String,
    pub title: Option<String>,
    pub web_image: Option<Image>,
    pub description: Option<String>,
    pub principal_maker: Option<String>,
    pub dating: Dating,
    pub historical_persons: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dating {
    pub presenting_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub key: Option<String>,
    pub p: Option<usize>,
    pub ps: Option<usize>,
    pub q: Option<String>,
    #[serde(default)]
    pub imgonly: bool,
}

#[derive(Debug, Deserialize)]
pub struct KeyParam {
    pub key: Option<String>,
}

pub type Catalog = Arc<Vec<Artwork>>;

/// The catalog served by `app()`.
pub fn fixture_catalog() -> Vec<Artwork> {
    vec![
        Artwork {
            description: Some("Officers and other civic guardsmen of District II in Amsterdam.".to_string()),
            presenting_date: Some("1642".to_string()),
            historical_persons: vec![
                "Frans Banninck Cocq".to_string(),
                "Willem van Ruytenburch".to_string(),
            ],
            ..Artwork::new("SK-C-5", "The Night Watch", "Rembrandt van Rijn")
        },
        Artwork {
            description: Some("A maidservant pours milk, entirely absorbed in her work.".to_string()),
            presenting_date: Some("c. 1660".to_string()),
            ..Artwork::new("SK-A-2344", "The Milkmaid", "Johannes Vermeer")
        },
        Artwork {
            presenting_date: Some("c. 1658".to_string()),
            ..Artwork::new("SK-A-2860", "View of Houses in Delft", "Johannes Vermeer")
        },
        Artwork {
            presenting_date: Some("c. 1628 - c. 1630".to_string()),
            ..Artwork::new("SK-A-135", "The Merry Drinker", "Frans Hals")
        },
        Artwork {
            presenting_date: Some("1887".to_string()),
            ..Artwork::new("SK-A-3262", "Self-portrait", "Vincent van Gogh")
        },
        Artwork {
            presenting_date: Some("c. 1665 - c. 1669".to_string()),
            ..Artwork::new("SK-C-216", "Isaac and Rebecca", "Rembrandt van Rijn")
        },
        // No maker: listed by the API, but not a usable overview item.
        Artwork {
            maker: None,
            presenting_date: Some("c. 1686 - c. 1710".to_string()),
            ..Artwork::new("BK-NM-1010", "Dolls' house of Petronella Oortman", "")
        },
        // No image: hidden from image-only searches.
        Artwork {
            image_url: None,
            ..Artwork::new("RP-P-OB-1", "Landscape with a Windmill", "Anonymous")
        },
    ]
}

pub fn app() -> Router {
    app_with_catalog(fixture_catalog())
}

pub fn app_with_catalog(catalog: Vec<Artwork>) -> Router {
    let catalog: Catalog = Arc::new(catalog);
    Router::new()
        .route("/api/{culture}/collection", get(search))
        .route("/api/{culture}/collection/{object_number}", get(object))
        .with_state(catalog)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_catalog(
    listener: TcpListener,
    catalog: Vec<Artwork>,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_catalog(catalog)).await
}

fn authorize(key: Option<&str>) -> Result<(), StatusCode> {
    match key {
        Some(key) if !key.is_empty() => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn search(
    State(catalog): State<Catalog>,
    Path(culture): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<CollectionPage>, StatusCode> {
    authorize(params.key.as_deref())?;

    let page = params.p.unwrap_or(1).max(1);
    let page_size = params.ps.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let query = params.q.as_deref().filter(|q| !q.is_empty());

    let matching: Vec<&Artwork> = catalog
        .iter()
        .filter(|art| !params.imgonly || art.image_url.is_some())
        .filter(|art| query.map_or(true, |q| art.matches(q)))
        .collect();

    let art_objects = matching
        .iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .map(|art| SearchEntry {
            id: format!("{culture}-{}", art.object_number),
            object_number: art.object_number.clone(),
            title: art.title.clone(),
            principal_or_first_maker: art.maker.clone(),
            has_image: art.image_url.is_some(),
            web_image: art.image_url.clone().map(|url| Image { url }),
        })
        .collect();

    Ok(Json(CollectionPage {
        count: matching.len(),
        art_objects,
    }))
}

async fn object(
    State(catalog): State<Catalog>,
    Path((culture, object_number)): Path<(String, String)>,
    Query(params): Query<KeyParam>,
) -> Result<Json<ObjectPage>, StatusCode> {
    authorize(params.key.as_deref())?;

    let art = catalog
        .iter()
        .find(|art| art.object_number == object_number)
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(ObjectPage {
        art_object: ObjectEntry {
            id: format!("{culture}-{}", art.object_number),
            object_number: art.object_number.clone(),
            title: art.title.clone(),
            web_image: art.image_url.clone().map(|url| Image { url }),
            description: art.description.clone(),
            principal_maker: art.maker.clone(),
            dating: Dating {
                presenting_date: art.presenting_date.clone(),
            },
            historical_persons: art.historical_persons.clone(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_entry_uses_api_field_names() {
        let entry = SearchEntry {
            id: "en-SK-C-5".to_string(),
            object_number: "SK-C-5".to_string(),
            title: Some("The Night Watch".to_string()),
            principal_or_first_maker: None,
            has_image: false,
            web_image: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["objectNumber"], "SK-C-5");
        assert_eq!(json["principalOrFirstMaker"], serde_json::Value::Null);
        assert_eq!(json["hasImage"], false);
        assert_eq!(json["webImage"], serde_json::Value::Null);
    }

    #[test]
    fn object_entry_nests_dating() {
        let entry = ObjectEntry {
            id: "en-SK-C-5".to_string(),
            object_number: "SK-C-5".to_string(),
            title: None,
            web_image: Some(Image { url: "https://images.example.org/x.jpg".to_string() }),
            description: None,
            principal_maker: Some("Rembrandt van Rijn".to_string()),
            dating: Dating { presenting_date: Some("1642".to_string()) },
            historical_persons: vec!["Frans Banninck Cocq".to_string()],
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["dating"]["presentingDate"], "1642");
        assert_eq!(json["principalMaker"], "Rembrandt van Rijn");
        assert_eq!(json["webImage"]["url"], "https://images.example.org/x.jpg");
        assert_eq!(json["historicalPersons"][0], "Frans Banninck Cocq");
    }

    #[test]
    fn query_matches_title_or_maker_ignoring_case() {
        let art = Artwork::new("SK-A-2344", "The Milkmaid", "Johannes Vermeer");
        assert!(art.matches("milkmaid"));
        assert!(art.matches("VERMEER"));
        assert!(!art.matches("Rembrandt"));
    }

    #[test]
    fn fixture_object_numbers_are_unique() {
        let catalog = fixture_catalog();
        let mut numbers: Vec<&str> = catalog.iter().map(|a| a.object_number.as_str()).collect();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), catalog.len());
    }

    #[test]
    fn search_params_ignore_unknown_fields() {
        let params: SearchParams =
            serde_json::from_str(r#"{"key":"k","p":2,"s":"artist","format":"json"}"#).unwrap();
        assert_eq!(params.p, Some(2));
        assert!(!params.imgonly);
        assert!(params.q.is_none());
    }
}
