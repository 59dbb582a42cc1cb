//! In-memory form of a `.def` file

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::path::{mod_file_name, normalize_mod_path};

/// Item name that marks a `<change>` as a template rather than an edit
pub const NONE_ITEM: &str = "NONE";

/// A parsed `.def` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionDocument {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    /// `<mod>` sections in file order
    pub sections: Vec<ModSection>,
}

impl DefinitionDocument {
    /// Title for display, or `fallback` (usually the file stem) when the
    /// definition has none.
    pub fn display_title<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(fallback)
    }

    /// Sections whose target has the same file name as `file_name`
    pub fn sections_for<'a>(&'a self, file_name: &'a str) -> impl Iterator<Item = &'a ModSection> + 'a {
        self.sections
            .iter()
            .filter(move |s| !s.file.is_empty() && s.file_name() == file_name)
    }

    /// Total number of directives across all sections
    pub fn directive_count(&self) -> usize {
        self.sections.iter().map(|s| s.directives.len()).sum()
    }
}

/// One `<mod file="...">` section: edits against a single baseline document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModSection {
    /// Target path as written, e.g. `Moria\Content\Tech\Data\DT_Items.json`
    pub file: String,
    /// Directives in file order
    pub directives: Vec<Directive>,
}

impl ModSection {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            directives: Vec::new(),
        }
    }

    /// Target path relative to the JSON data root, using forward slashes
    pub fn relative_path(&self) -> String {
        normalize_mod_path(&self.file)
    }

    /// Target file name, e.g. `DT_Items.json`
    pub fn file_name(&self) -> &str {
        mod_file_name(&self.file)
    }

    /// Append a directive
    pub fn push(&mut self, directive: Directive) -> &mut Self {
        self.directives.push(directive);
        self
    }
}

/// A single edit inside a `<mod>` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    /// `<add_imports>`: JSON array of import entries
    AddImports { payload: String },
    /// `<add_row name="...">`: JSON object for a data-table row
    AddRow { name: String, payload: String },
    /// `<change item="..." property="..." value="..."/>`
    Change(Change),
    /// `<delete item="..." property="..." value="..."/>`
    Delete(Delete),
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Self::AddImports { .. } => DirectiveKind::AddImports,
            Self::AddRow { .. } => DirectiveKind::AddRow,
            Self::Change(_) => DirectiveKind::Change,
            Self::Delete(_) => DirectiveKind::Delete,
        }
    }
}

/// Directive discriminant, for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    AddImports,
    AddRow,
    Change,
    Delete,
}

impl DirectiveKind {
    /// The XML element name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddImports => "add_imports",
            Self::AddRow => "add_row",
            Self::Change => "change",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set a property on a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// Row or export name; [`NONE_ITEM`] for a template entry
    pub item: String,
    /// Dotted property path
    pub property: String,
    /// New value as text
    pub value: String,
    /// Tag being replaced, for tag-container properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
}

impl Change {
    pub fn new(item: impl Into<String>, property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            property: property.into(),
            value: value.into(),
            original: None,
        }
    }
}

/// Remove a tag from a tag-container property
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delete {
    pub item: String,
    pub property: String,
    /// Tag to remove
    pub value: String,
}
