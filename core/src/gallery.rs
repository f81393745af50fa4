//! Consumer-side accumulation of item batches into a sectioned listing.

use crate::event::LoadMode;
use crate::model::CollectionItem;

/// Items sharing one section name, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub items: Vec<CollectionItem>,
}

/// The listing a presentation layer shows for an overview controller.
///
/// Sections keep the order in which their first item arrived. Items with an
/// id already present are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    sections: Vec<Section>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one `ItemBatch` event.
    pub fn apply(&mut self, mode: LoadMode, items: Vec<CollectionItem>) {
        if mode == LoadMode::Overwrite {
            self.sections.clear();
        }
        for item in items {
            self.insert(item);
        }
    }

    fn insert(&mut self, item: CollectionItem) {
        if self.items().any(|existing| existing.id == item.id) {
            return;
        }
        match self.sections.iter_mut().find(|s| s.name == item.section) {
            Some(section) => section.items.push(item),
            None => self.sections.push(Section {
                name: item.section.clone(),
                items: vec![item],
            }),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All items in display order: section by section.
    pub fn items(&self) -> impl Iterator<Item = &CollectionItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    /// The item at display position `index`.
    pub fn get(&self, index: usize) -> Option<&CollectionItem> {
        self.items().nth(index)
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
