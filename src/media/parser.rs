//! Listing output parsing.

use crate::media::item::RemoteItem;

/// Parse the flat listing printed by the enumeration tool.
///
/// Each record is `"<id> <title>"` on its own line. The title may be empty.
/// Lines with no separator or no id are skipped individually. At most `limit` items are returned.
pub fn parse_listing(output: &str, limit: usize) -> Vec<RemoteItem> {
    output
        .lines()
        .filter_map(|line| {
            let item = parse_line(line);
            if item.is_none() && !line.trim().is_empty() {
                tracing::debug!("Skipping malformed listing line: {:?}", line);
            }
            item
        })
        .take(limit)
        .collect()
}

/// Parse a single listing record.
fn parse_line(line: &str) -> Option<RemoteItem> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    let (id, title) = line.split_once(' ')?;
    if id.is_empty() {
        return None;
    }

    Some(RemoteItem::new(id, title))
}
