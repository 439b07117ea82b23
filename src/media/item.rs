//! Remote item representation.

use crate::dedup::{hash_item, DedupKey};

/// One row of a creator's remote listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    /// Platform video ID.
    pub id: String,

    /// Video title (caption) as reported by the listing.
    pub title: String,
}

impl RemoteItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Dedup key for this item.
    pub fn dedup_key(&self) -> DedupKey {
        hash_item(&self.id, &self.title)
    }

    /// Title shortened for status and log lines.
    pub fn short_title(&self, max_chars: usize) -> String {
        self.title.chars().take(max_chars).collect()
    }
}
