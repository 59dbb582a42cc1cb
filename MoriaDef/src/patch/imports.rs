//! Import table merging
//!
//! Rows added by a definition often reference classes or icons that the
//! baseline asset never imported. Their `Imports` entries travel with the
//! definition and are appended here, keyed by `ObjectName`.

use std::collections::HashSet;

use serde_json::Value;

use crate::json::str_field;

fn object_name(entry: &Value) -> &str {
    str_field(entry, "ObjectName").unwrap_or_default()
}

/// Append `entries` to `destination`, skipping any whose `ObjectName` is
/// already present.
///
/// Duplicates inside `entries` collapse too (first occurrence wins). Existing
/// entries keep their order; new ones go at the end in their original order.
/// Returns the number of entries appended.
pub fn merge_imports<I>(destination: &mut Vec<Value>, entries: I) -> usize
where
    I: IntoIterator<Item = Value>,
{
    let mut seen: HashSet<String> = destination
        .iter()
        .map(|entry| object_name(entry).to_string())
        .collect();

    let mut added = 0;
    for entry in entries {
        let name = object_name(&entry).to_string();
        if seen.contains(&name) {
            tracing::debug!("Import already present: {}", name);
            continue;
        }
        tracing::info!("Added import: {}", name);
        seen.insert(name);
        destination.push(entry);
        added += 1;
    }
    added
}

/// Combine several `add_imports` payloads into one de-duplicated list.
///
/// Used when bundling many rows into a single definition. Fragments that do
/// not parse as a JSON array are skipped with a warning, and entries without
/// an `ObjectName` are dropped.
pub fn combine_import_fragments<'a, I>(fragments: I) -> Vec<Value>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut combined = Vec::new();
    for fragment in fragments {
        match serde_json::from_str::<Vec<Value>>(fragment) {
            Ok(entries) => {
                let named = entries.into_iter().filter(|e| !object_name(e).is_empty());
                merge_imports(&mut combined, named);
            }
            Err(e) => tracing::warn!("Skipping unparsable imports fragment: {}", e),
        }
    }
    combined
}
