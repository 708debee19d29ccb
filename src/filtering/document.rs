//! Document-level filtering.
use super::Filter;
use crate::pipelines::Document;

/// Filters out documents that do not have enough Malayalam content.
///
/// The count is the number of Malayalam characters in the document's segments.
/// A page with a handful of Malayalam words in a menu is not worth keeping.
#[derive(Debug, Clone)]
pub struct MinContent {
    min_chars: usize,
}

impl MinContent {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }
}

impl Filter<&Document> for MinContent {
    fn detect(&self, doc: &Document) -> bool {
        doc.script_chars() >= self.min_chars
    }
}

impl Default for MinContent {
    /// 40 Malayalam characters.
    fn default() -> Self {
        Self { min_chars: 40 }
    }
}
