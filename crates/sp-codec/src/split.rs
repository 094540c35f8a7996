//! Depth-aware tokenization of the field list.
//!
//! Naive comma splitting breaks as soon as a nested JSON value contains a
//! comma (`ips=["10.0.0.5","fe80::1"]`). The splitter here only treats a
//! comma as a field separator at bracket depth zero, outside of string
//! literals.

use sp_common::{Error, Result};

/// Split a field list into `name=value` chunks on commas at bracket depth
/// zero. Chunks are trimmed; empty chunks are dropped.
pub fn split_fields(list: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0usize;

    for (idx, ch) in list.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' | '[' if !in_string => depth += 1,
            '}' | ']' if !in_string => depth = depth.saturating_sub(1),
            ',' if !in_string && depth == 0 => {
                chunks.push(&list[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    chunks.push(&list[start..]);

    chunks
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Split one chunk into its `name` and `value` halves at the first `=`.
pub fn split_pair(chunk: &str) -> Result<(&str, &str)> {
    match chunk.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim(), value.trim()))
        }
        _ => Err(Error::malformed(format!(
            "field is not a name=value pair: {chunk:?}"
        ))),
    }
}
