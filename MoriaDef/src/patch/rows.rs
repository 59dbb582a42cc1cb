//! Row upserts for data tables

use std::fmt;

use serde_json::Value;

use crate::json::str_field;

/// What [`upsert_row`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertResult {
    /// No row had the name; the new row was appended
    Inserted,
    /// An existing row was replaced wholesale
    Updated,
    /// An existing row was left alone (overwrite disabled)
    Skipped,
}

impl fmt::Display for UpsertResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inserted => write!(f, "inserted"),
            Self::Updated => write!(f, "updated"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Insert `row` under `name`, or replace the existing row of that name.
///
/// Replacement swaps the whole row object; fields are not merged. With
/// `overwrite` disabled an existing row is kept as-is. A missing row is
/// always appended, regardless of `overwrite`.
pub fn upsert_row(rows: &mut Vec<Value>, name: &str, row: Value, overwrite: bool) -> UpsertResult {
    let existing = rows
        .iter()
        .position(|candidate| str_field(candidate, "Name") == Some(name));

    match existing {
        Some(index) if overwrite => {
            rows[index] = row;
            tracing::info!("Updated existing row: {}", name);
            UpsertResult::Updated
        }
        Some(_) => {
            tracing::info!("Skipped existing row: {}", name);
            UpsertResult::Skipped
        }
        None => {
            rows.push(row);
            tracing::info!("Added new row: {}", name);
            UpsertResult::Inserted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Value> {
        vec![
            json!({"Name": "Torch", "Value": [{"Name": "BurnTime", "Value": 10}]}),
            json!({"Name": "Pick", "Value": []}),
        ]
    }

    #[test]
    fn test_insert_appends() {
        let mut table = rows();
        let lantern = json!({"Name": "Lantern", "Value": []});

        assert_eq!(upsert_row(&mut table, "Lantern", lantern.clone(), false), UpsertResult::Inserted);
        assert_eq!(table.len(), 3);
        assert_eq!(table[2], lantern);
        assert_eq!(table[..2], rows()[..]);
    }

    #[test]
    fn test_update_replaces_whole_row() {
        let mut table = rows();
        let torch = json!({"Name": "Torch", "Value": [{"Name": "Fuel", "Value": 1}]});

        assert_eq!(upsert_row(&mut table, "Torch", torch.clone(), true), UpsertResult::Updated);
        assert_eq!(table[0], torch);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_skip_keeps_existing() {
        let mut table = rows();
        let torch = json!({"Name": "Torch", "Value": []});

        assert_eq!(upsert_row(&mut table, "Torch", torch, false), UpsertResult::Skipped);
        assert_eq!(table, rows());
    }
}
