//! Records exposed to controllers and consumers, derived from wire DTOs.

use url::Url;
use uuid::Uuid;

use crate::types::{ArtObject, ArtObjectDetail};

/// One tile of the overview listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionItem {
    /// The object number; the key the detail endpoint is addressed by.
    pub id: String,
    pub name: String,
    /// Section the item is grouped under (its principal or first maker).
    pub section: String,
    pub image_url: Url,
}

impl CollectionItem {
    /// Derive an item from a raw search entry.
    ///
    /// Returns `None` unless title, maker and an absolute image URL are all
    /// present.
    pub fn from_art_object(raw: &ArtObject) -> Option<Self> {
        let image_url = raw.web_image.as_ref()?.url.as_deref()?;
        let image_url = Url::parse(image_url).ok()?;
        Some(Self {
            id: raw.object_number.clone(),
            name: raw.title.clone()?,
            section: raw.principal_or_first_maker.clone()?,
            image_url,
        })
    }
}

/// Derive items from a page of raw entries, silently dropping incomplete ones.
pub fn collection_items(raw: &[ArtObject]) -> Vec<CollectionItem> {
    raw.iter().filter_map(CollectionItem::from_art_object).collect()
}

/// One labelled line of the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetailRow {
    /// Unique per row, so rows with equal label and value stay distinct.
    pub id: Uuid,
    pub label: String,
    pub value: String,
    /// Whether activating the row may start a search for `value`.
    pub allows_search: bool,
}

impl DetailRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>, allows_search: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            value: value.into(),
            allows_search,
        }
    }
}

struct RowSource {
    label: &'static str,
    allows_search: bool,
    values: fn(&ArtObjectDetail) -> Vec<String>,
}

fn object_number(object: &ArtObjectDetail) -> Vec<String> {
    vec![object.object_number.clone()]
}

fn title(object: &ArtObjectDetail) -> Vec<String> {
    object.title.iter().cloned().collect()
}

fn description(object: &ArtObjectDetail) -> Vec<String> {
    object.description.iter().cloned().collect()
}

fn presenting_date(object: &ArtObjectDetail) -> Vec<String> {
    object
        .dating
        .as_ref()
        .and_then(|dating| dating.presenting_date.clone())
        .into_iter()
        .collect()
}

fn historical_persons(object: &ArtObjectDetail) -> Vec<String> {
    object.historical_persons.clone().unwrap_or_default()
}

fn principal_maker(object: &ArtObjectDetail) -> Vec<String> {
    object.principal_maker.iter().cloned().collect()
}

/// Field-to-row mapping, in display order.
const ROW_SOURCES: &[RowSource] = &[
    RowSource { label: "Object Number", allows_search: false, values: object_number },
    RowSource { label: "Title", allows_search: true, values: title },
    RowSource { label: "Description", allows_search: false, values: description },
    RowSource { label: "Presenting Date", allows_search: true, values: presenting_date },
    RowSource { label: "Historical Person", allows_search: true, values: historical_persons },
    RowSource { label: "Principal Maker", allows_search: true, values: principal_maker },
];

/// Build the detail rows for one object.
pub fn detail_rows(object: &ArtObjectDetail) -> Vec<DetailRow> {
    ROW_SOURCES
        .iter()
        .flat_map(|source| {
            (source.values)(object)
                .into_iter()
                .map(move |value| DetailRow::new(source.label, value, source.allows_search))
        })
        .collect()
}
