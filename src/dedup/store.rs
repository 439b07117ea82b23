//! Seen-set tracking and persistence.
//!
//! The seen-set is kept in memory by the cycle runner and written to a JSON
//! state file at the end of every cycle. The store never fails the process:
//! a missing or corrupt file loads as an empty set.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dedup::hash::DedupKey;
use crate::error::PersistenceError;

/// Set of dedup keys already downloaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    keys: BTreeSet<DedupKey>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &DedupKey) -> bool {
        self.keys.contains(key)
    }

    /// Insert a key, returning `true` if it was not present.
    pub fn insert(&mut self, key: DedupKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DedupKey> {
        self.keys.iter()
    }
}

impl FromIterator<DedupKey> for SeenSet {
    fn from_iter<I: IntoIterator<Item = DedupKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// On-disk layout of the state file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    downloaded_videos: Vec<DedupKey>,

    #[serde(default)]
    download_folder: Option<PathBuf>,
}

/// Everything the state file remembers.
#[derive(Debug, Default)]
pub struct StoredState {
    pub seen: SeenSet,
    pub download_folder: Option<PathBuf>,
}

/// JSON-file persistence for the seen-set.
#[derive(Debug, Clone)]
pub struct SeenSetStore {
    path: PathBuf,
}

impl SeenSetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the seen-set, falling back to an empty set.
    pub fn load(&self) -> SeenSet {
        self.load_state().seen
    }

    /// Load the seen-set and remembered download folder.
    ///
    /// A missing, unreadable or corrupt file logs a warning and yields empty
    /// state rather than an error.
    pub fn load_state(&self) -> StoredState {
        match self.try_load() {
            Ok(Some(state)) => {
                tracing::debug!(
                    "Loaded {} downloaded videos from {}",
                    state.seen.len(),
                    self.path.display()
                );
                state
            }
            Ok(None) => {
                tracing::warn!("No state file at {}, starting fresh", self.path.display());
                StoredState::default()
            }
            Err(e) => {
                tracing::warn!("Error loading state: {}", e);
                StoredState::default()
            }
        }
    }

    fn try_load(&self) -> Result<Option<StoredState>, PersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let persisted: PersistedState =
            serde_json::from_str(&content).map_err(|source| PersistenceError::Parse {
                path: self.path.clone(),
                source,
            })?;

        Ok(Some(StoredState {
            seen: persisted.downloaded_videos.into_iter().collect(),
            download_folder: persisted.download_folder,
        }))
    }

    /// Overwrite the state file with `seen` and the current download folder.
    ///
    /// The content is written to a temporary sibling and renamed into place,
    /// so an interrupted save leaves the previous file untouched.
    pub fn save(&self, seen: &SeenSet, download_folder: &Path) -> Result<(), PersistenceError> {
        let persisted = PersistedState {
            downloaded_videos: seen.iter().cloned().collect(),
            download_folder: Some(download_folder.to_path_buf()),
        };
        let content = serde_json::to_string_pretty(&persisted)?;

        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("state.json");
        let temp_path = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        if let Err(source) = fs::write(&temp_path, content) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(source));
        }

        if let Err(source) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(source));
        }

        tracing::debug!("Saved {} keys to {}", seen.len(), self.path.display());
        Ok(())
    }

    /// Produce a fresh, empty seen-set.
    ///
    /// Callers must confirm with the user first and save afterwards.
    pub fn reset(&self) -> SeenSet {
        SeenSet::new()
    }
}
