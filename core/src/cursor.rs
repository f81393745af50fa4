/// Position in a paginated result set.
///
/// Holds the next 1-based page to request, or nothing once an empty page has
/// shown the results are exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor(Option<u32>);

impl PageCursor {
    pub fn first() -> Self {
        Self(Some(1))
    }

    pub fn next_page(self) -> Option<u32> {
        self.0
    }

    /// The cursor after `page` loaded successfully with or without items.
    pub fn after(page: u32, empty: bool) -> Self {
        if empty {
            Self(None)
        } else {
            Self(Some(page + 1))
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::first()
    }
}
