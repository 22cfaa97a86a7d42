//! Parsing of operator-entered lists

use crate::{AclError, Result};

/// Split a comma-separated list of drive ids.
///
/// Entries are trimmed; blank entries (a trailing comma, an empty line) are
/// dropped.
pub fn parse_drive_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|drive| !drive.is_empty())
        .map(String::from)
        .collect()
}

/// Split a comma-separated list of 1-based list positions.
///
/// Every entry must be a non-negative integer; range checking against the
/// displayed list is left to [`crate::apply`], which ignores positions it
/// cannot match.
pub fn parse_indices(input: &str) -> Result<Vec<usize>> {
    input
        .split(',')
        .map(str::trim)
        .map(|raw| {
            raw.parse::<usize>().map_err(|_| AclError::InvalidIndex {
                input: raw.to_string(),
            })
        })
        .collect()
}
