//! Deduplication module.
//!
//! Provides:
//! - Stable identity hashing of remote items
//! - The persisted seen-set of completed downloads

pub mod hash;
pub mod store;

pub use hash::{hash_item, DedupKey};
pub use store::{SeenSet, SeenSetStore, StoredState};
