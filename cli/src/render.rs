//! Plain-text rendering of listings and detail records.
//!
//! Items and rows are numbered from 1 in display order; those numbers are
//! what `open` and `follow` take in a browse session.

use std::fmt::Write;

use gallery_core::{DetailRow, ErrorAlert, Gallery};

pub fn overview(title: &str, gallery: &Gallery) -> String {
    let mut out = format!("== {title} ==\n");
    if gallery.is_empty() {
        out.push_str("No results.\n");
        return out;
    }

    let mut position = 0;
    for section in gallery.sections() {
        let _ = writeln!(out, "{}", section.name);
        for item in &section.items {
            position += 1;
            let _ = writeln!(out, "  {position:>3}. {} [{}]", item.name, item.id);
        }
    }
    out
}

/// Searchable rows are marked with `*`.
pub fn detail(id: &str, rows: &[DetailRow]) -> String {
    let mut out = format!("== {id} ==\n");
    for (index, row) in rows.iter().enumerate() {
        let marker = if row.allows_search { '*' } else { ' ' };
        let _ = writeln!(out, "{marker} {:>3}. {}: {}", index + 1, row.label, row.value);
    }
    out
}

pub fn alert(alert: &ErrorAlert) -> String {
    format!("{}: {}\n", alert.title, alert.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::{CollectionItem, LoadMode};
    use pretty_assertions::assert_eq;
    use url::Url;

    fn item(id: &str, name: &str, section: &str) -> CollectionItem {
        CollectionItem {
            id: id.to_string(),
            name: name.to_string(),
            section: section.to_string(),
            image_url: Url::parse("https://images.example.org/x.jpg").unwrap(),
        }
    }

    #[test]
    fn overview_numbers_items_across_sections() {
        let mut gallery = Gallery::new();
        gallery.apply(
            LoadMode::Overwrite,
            vec![
                item("SK-A-2344", "The Milkmaid", "Johannes Vermeer"),
                item("SK-C-5", "The Night Watch", "Rembrandt van Rijn"),
                item("SK-A-2860", "View of Houses in Delft", "Johannes Vermeer"),
            ],
        );
        assert_eq!(
            overview("Rijksmuseum Collection", &gallery),
            "== Rijksmuseum Collection ==\n\
             Johannes Vermeer\n\
             \x20   1. The Milkmaid [SK-A-2344]\n\
             \x20   2. View of Houses in Delft [SK-A-2860]\n\
             Rembrandt van Rijn\n\
             \x20   3. The Night Watch [SK-C-5]\n"
        );
    }

    #[test]
    fn empty_overview() {
        assert_eq!(overview("q", &Gallery::new()), "== q ==\nNo results.\n");
    }

    #[test]
    fn detail_marks_searchable_rows() {
        let rows = vec![
            DetailRow::new("Object Number", "SK-C-5", false),
            DetailRow::new("Principal Maker", "Rembrandt van Rijn", true),
        ];
        assert_eq!(
            detail("SK-C-5", &rows),
            "== SK-C-5 ==\n\
             \x20   1. Object Number: SK-C-5\n\
             *   2. Principal Maker: Rembrandt van Rijn\n"
        );
    }
}
