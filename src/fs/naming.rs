//! Filename generation and manipulation.

use crate::error::{Error, Result};

/// Maximum number of characters kept from a title in a filename.
pub const MAX_TITLE_CHARS: usize = 50;

/// Reduce a title to a filename-safe fragment.
///
/// Keeps alphanumerics (any script), spaces, `-` and `_`, truncates to
/// [`MAX_TITLE_CHARS`] characters and trims trailing whitespace.
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .take(MAX_TITLE_CHARS)
        .collect();

    kept.trim_end().to_string()
}

/// Validate a path component taken from remote data (item ids, handles).
///
/// Rejects rather than rewrites, so the same input always yields the same
/// filename or the same error.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name
        )));
    }

    // '%' would be read as a placeholder by the output template
    if name.contains('%') {
        return Err(Error::InvalidFilename(format!(
            "Template characters not allowed: '{}'",
            name
        )));
    }

    if name.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(name.to_string())
}

/// Build the deterministic filename stem for an item.
///
/// The stem is `{account}_{id}_{sanitized title}`, or `{account}_{id}` when
/// nothing of the title survives sanitization.
pub fn output_stem(account: &str, id: &str, title: &str) -> Result<String> {
    let account = sanitize_path_component(account)?;
    let id = sanitize_path_component(id)?;
    let safe_title = sanitize_title(title);

    if safe_title.is_empty() {
        Ok(format!("{}_{}", account, id))
    } else {
        Ok(format!("{}_{}_{}", account, id, safe_title))
    }
}
