//! Identity hashing for deduplication.

use std::fmt;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Stable identity of a remote item, used as the sole "already downloaded" key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DedupKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Derive the dedup key for an item.
///
/// This is the lowercase hex MD5 of `"{id}_{title}"`. It depends on nothing
/// but its inputs, so keys stay valid across restarts.
pub fn hash_item(id: &str, title: &str) -> DedupKey {
    let mut hasher = Md5::new();
    hasher.update(id.as_bytes());
    hasher.update(b"_");
    hasher.update(title.as_bytes());
    DedupKey(format!("{:x}", hasher.finalize()))
}
