//! Record lookup in exported data tables and blueprint assets
//!
//! Two document shapes carry editable records:
//!
//! - **Data tables** (`DT_Items`, `DT_Storage`, ...): exports with a
//!   `Table.Data` array hold rows of `{"Name": ..., "Value": [properties]}`.
//! - **Single assets** (gameplay effects, blueprint defaults): `Exports` is a
//!   list of `{"ObjectName": ..., "Data": [properties]}`. The logical item
//!   name usually appears decorated, e.g. `Default__GE_Heal_C`.

use std::fmt;

use serde_json::Value;

use super::str_field;

/// How item names are matched against export `ObjectName`s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatch {
    /// `ObjectName` must equal the item name
    Exact,
    /// Try the compiled-class variants, highest precedence first
    #[default]
    Decorated,
}

/// Name variants tried for `item` in [`NameMatch::Decorated`] mode, in order
pub fn decorated_names(item: &str) -> [String; 4] {
    [
        format!("Default__{item}_C"),
        format!("Default__{item}"),
        item.to_string(),
        format!("{item}_C"),
    ]
}

/// Structural shape of a baseline document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// An export carries `Table.Data` rows
    DataTable,
    /// `Exports` is a plain list of named exports
    SingleAsset,
}

impl TableShape {
    /// Probe a document, trying the data-table layout first.
    ///
    /// Returns `None` when the document has no `Exports` array at all.
    pub fn detect(doc: &Value) -> Option<Self> {
        let exports = doc.get("Exports")?.as_array()?;
        if exports.iter().any(|e| table_data(e).is_some()) {
            Some(Self::DataTable)
        } else {
            Some(Self::SingleAsset)
        }
    }
}

impl fmt::Display for TableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataTable => write!(f, "data table"),
            Self::SingleAsset => write!(f, "single asset"),
        }
    }
}

/// Why a record lookup came back empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupMiss {
    /// The document has no `Exports` array
    NoExports,
    /// No row or export matched the item name
    NotFound {
        /// Shape that was searched
        shape: TableShape,
    },
}

impl fmt::Display for LookupMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoExports => write!(f, "document has no Exports"),
            Self::NotFound { shape } => write!(f, "no matching record in {shape}"),
        }
    }
}

fn table_data(export: &Value) -> Option<&Vec<Value>> {
    export.get("Table")?.get("Data")?.as_array()
}

/// `Table.Data` rows of every export carrying one, in export order
pub fn tables(doc: &Value) -> impl Iterator<Item = &Vec<Value>> {
    doc.get("Exports")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(table_data)
}

/// Mutable `Table.Data` rows of every export carrying one, in export order
pub fn tables_mut(doc: &mut Value) -> impl Iterator<Item = &mut Vec<Value>> {
    doc.get_mut("Exports")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(|export| export.get_mut("Table")?.get_mut("Data")?.as_array_mut())
}

/// First data-table row named `name`, searching every table export
pub fn find_row_mut<'a>(doc: &'a mut Value, name: &str) -> Option<&'a mut Value> {
    tables_mut(doc)
        .flat_map(|rows| rows.iter_mut())
        .find(|row| str_field(row, "Name") == Some(name))
}

/// Rows an upsert of `name` should go to: the table already holding that
/// row, otherwise the first table.
pub fn rows_for_mut<'a>(doc: &'a mut Value, name: &str) -> Option<&'a mut Vec<Value>> {
    let index = tables(doc)
        .position(|rows| rows.iter().any(|row| str_field(row, "Name") == Some(name)))
        .unwrap_or(0);
    tables_mut(doc).nth(index)
}

/// Finds the property array of a named record
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordLocator {
    mode: NameMatch,
}

impl RecordLocator {
    pub fn new(mode: NameMatch) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> NameMatch {
        self.mode
    }

    /// Locate `item` and return its property array.
    ///
    /// Data-table rows are matched on `Name` exactly and yield their `Value`
    /// array. Single-asset exports are matched on `ObjectName` according to
    /// the locator's [`NameMatch`] mode, and only exports with a non-empty
    /// `Data` array qualify; the first variant with a hit wins.
    pub fn find<'a>(&self, doc: &'a mut Value, item: &str) -> Result<&'a mut Vec<Value>, LookupMiss> {
        let shape = TableShape::detect(doc).ok_or(LookupMiss::NoExports)?;
        let found = match shape {
            TableShape::DataTable => find_row(doc, item),
            TableShape::SingleAsset => self.find_export(doc, item),
        };
        found.ok_or(LookupMiss::NotFound { shape })
    }

    fn find_export<'a>(&self, doc: &'a mut Value, item: &str) -> Option<&'a mut Vec<Value>> {
        let candidates = match self.mode {
            NameMatch::Exact => vec![item.to_string()],
            NameMatch::Decorated => decorated_names(item).to_vec(),
        };

        let exports = doc.get("Exports")?.as_array()?;
        let index = candidates.iter().find_map(|name| {
            exports.iter().position(|export| {
                str_field(export, "ObjectName") == Some(name.as_str())
                    && export
                        .get("Data")
                        .and_then(Value::as_array)
                        .is_some_and(|data| !data.is_empty())
            })
        })?;

        doc.get_mut("Exports")?
            .get_mut(index)?
            .get_mut("Data")?
            .as_array_mut()
    }
}

fn find_row<'a>(doc: &'a mut Value, item: &str) -> Option<&'a mut Vec<Value>> {
    find_row_mut(doc, item)?.get_mut("Value")?.as_array_mut()
}
