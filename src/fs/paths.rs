//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::naming::sanitize_path_component;

/// Extensions the fetch tool may produce for the media file itself.
const MEDIA_EXTENSIONS: &[&str] = &[
    "mp4", "webm", "mkv", "mov", "m4a", "mp3", "aac", "opus", "ogg",
];

/// Container extensions eligible for post-processing.
const CONVERTIBLE_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv"];

/// Get the per-account download folder.
pub fn account_folder(base_dir: &Path, account: &str) -> Result<PathBuf> {
    let account = sanitize_path_component(account)?;
    Ok(base_dir.join(account))
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get a lowercase extension for a path.
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Whether a file can be handed to the transcoder.
pub fn is_convertible(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| CONVERTIBLE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Locate the media file written for `stem` in `dir`.
///
/// Sidecars (`.info.json`, thumbnails) share the stem and are ignored.
/// Convertible containers win over other media; ties break by name.
pub fn find_output(dir: &Path, stem: &str) -> Result<Option<PathBuf>> {
    if !dir.exists() {
        return Ok(None);
    }

    let prefix = format!("{}.", stem);
    let mut candidates = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // Exactly one extension after the stem
        let Some(rest) = name.strip_prefix(&prefix) else {
            continue;
        };
        if rest.contains('.') {
            continue;
        }

        let Some(ext) = extension_of(&path) else {
            continue;
        };
        if MEDIA_EXTENSIONS.contains(&ext.as_str()) {
            candidates.push(path);
        }
    }

    candidates.sort_by_key(|p| (!is_convertible(p), p.clone()));
    Ok(candidates.into_iter().next())
}
