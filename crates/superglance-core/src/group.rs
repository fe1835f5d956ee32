//! Environment groups: one section standing for several environments

use crate::config::Document;

/// Key that turns a section into a group
pub const GROUP_KEY: &str = "group";

const STRIPPED_CHARS: [char; 5] = ['[', ']', '"', '\'', ' '];

/// Environments to run for `requested`, in order.
///
/// Members are returned as written (duplicates included) and are not
/// validated; a group member's own `group` key is not followed.
pub fn expand(document: &Document, requested: &str) -> Vec<String> {
    match document.get(requested, GROUP_KEY) {
        Some(value) => parse_members(value),
        None => vec![requested.to_string()],
    }
}

/// Split a `group` value such as `[east, 'west']` into member names
pub fn parse_members(value: &str) -> Vec<String> {
    let cleaned: String = value
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();
    cleaned.split(',').map(str::to_string).collect()
}
