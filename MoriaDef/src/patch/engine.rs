//! Definition application
//!
//! [`PatchEngine`] folds the directives of a definition over one baseline
//! document, in file order. Every directive is best-effort: a missing row,
//! an unresolved path or a bad payload skips that directive and the rest
//! still run. What happened is collected in an [`ApplyReport`].

use std::fmt;

use serde_json::Value;

use super::imports::merge_imports;
use super::rows::{UpsertResult, upsert_row};
use super::tags::{add_tag, is_tag_container, remove_tag, tag_list_mut};
use crate::definition::{Change, DefinitionDocument, Delete, Directive, DirectiveKind, ModSection, NONE_ITEM};
use crate::json::table::rows_for_mut;
use crate::json::{LookupMiss, NameMatch, PropertyPath, RecordLocator, coerce};
use crate::utils::path::mod_file_name;

/// Options controlling how directives are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// How `item` names are matched against single-asset exports
    pub name_match: NameMatch,
    /// Replace existing rows on `add_row` (otherwise keep them)
    pub overwrite_rows: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            name_match: NameMatch::Decorated,
            overwrite_rows: true,
        }
    }
}

impl ApplyOptions {
    /// Options for applying a single definition to a single JSON file:
    /// exact record names, rows overwritten.
    pub fn standalone() -> Self {
        Self {
            name_match: NameMatch::Exact,
            overwrite_rows: true,
        }
    }

    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite_rows = overwrite;
        self
    }
}

/// Why a directive did not change the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The item is the `NONE` template marker
    TemplateItem,
    /// A required attribute or body is empty
    MissingField {
        field: &'static str,
    },
    /// The `add_imports`/`add_row` body is not the expected JSON
    InvalidPayload {
        message: String,
    },
    /// The document has no `Imports` array to merge into
    NoImports,
    /// The document has no `Table.Data` rows
    NoTable,
    /// The row already exists and overwriting is disabled
    RowExists,
    /// No row or export matched the item
    RecordNotFound(LookupMiss),
    /// A parent segment of the property path did not resolve
    PathNotFound {
        path: String,
    },
    /// The leaf property is not present under its parent
    PropertyNotFound {
        property: String,
    },
    /// `delete` on a property that is not a tag container
    NotTagContainer {
        property: String,
    },
    /// The row has no tag list under that property
    TagListNotFound,
    /// `delete` of a tag that is not in the list
    TagNotPresent {
        tag: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TemplateItem => write!(f, "template entry ({NONE_ITEM})"),
            Self::MissingField { field } => write!(f, "missing {field}"),
            Self::InvalidPayload { message } => write!(f, "invalid payload: {message}"),
            Self::NoImports => write!(f, "document has no Imports"),
            Self::NoTable => write!(f, "document has no data table"),
            Self::RowExists => write!(f, "row exists and overwrite is disabled"),
            Self::RecordNotFound(miss) => write!(f, "{miss}"),
            Self::PathNotFound { path } => write!(f, "property path '{path}' not found"),
            Self::PropertyNotFound { property } => write!(f, "property '{property}' not found"),
            Self::NotTagContainer { property } => write!(f, "'{property}' is not a tag container"),
            Self::TagListNotFound => write!(f, "tag list not found"),
            Self::TagNotPresent { tag } => write!(f, "tag '{tag}' not present"),
        }
    }
}

/// A directive that was skipped, with enough context for a status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDirective {
    /// `file` attribute of the section
    pub section: String,
    /// Position of the directive within its section
    pub index: usize,
    pub kind: DirectiveKind,
    /// Row/item name, when the directive has one
    pub item: Option<String>,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} <{}>", self.section, self.index, self.kind)?;
        if let Some(item) = &self.item {
            write!(f, " '{item}'")?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// Outcome of applying one or more sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Directives that changed (or re-affirmed) the document
    pub applied: usize,
    pub imports_added: usize,
    pub rows_inserted: usize,
    pub rows_updated: usize,
    pub properties_changed: usize,
    pub tags_edited: usize,
    pub skipped: Vec<SkippedDirective>,
}

impl ApplyReport {
    /// Total number of directives seen
    pub fn total(&self) -> usize {
        self.applied + self.skipped.len()
    }

    /// Whether every directive applied
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: ApplyReport) {
        self.applied += other.applied;
        self.imports_added += other.imports_added;
        self.rows_inserted += other.rows_inserted;
        self.rows_updated += other.rows_updated;
        self.properties_changed += other.properties_changed;
        self.tags_edited += other.tags_edited;
        self.skipped.extend(other.skipped);
    }

    fn record(&mut self, applied: Applied) {
        self.applied += 1;
        match applied {
            Applied::Imports(count) => self.imports_added += count,
            Applied::Row(UpsertResult::Inserted) => self.rows_inserted += 1,
            Applied::Row(_) => self.rows_updated += 1,
            Applied::Property => self.properties_changed += 1,
            Applied::Tags => self.tags_edited += 1,
        }
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} applied, {} skipped ({} imports added, {} rows inserted, {} rows updated, {} properties changed, {} tag edits)",
            self.applied,
            self.skipped.len(),
            self.imports_added,
            self.rows_inserted,
            self.rows_updated,
            self.properties_changed,
            self.tags_edited
        )
    }
}

/// What a single directive did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// `add_imports`, with the number of entries appended
    Imports(usize),
    /// `add_row`
    Row(UpsertResult),
    /// `change` of a scalar property
    Property,
    /// `change` or `delete` on a tag container
    Tags,
}

/// Applies definition directives to baseline documents
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchEngine {
    options: ApplyOptions,
    locator: RecordLocator,
}

impl PatchEngine {
    pub fn new(options: ApplyOptions) -> Self {
        Self {
            options,
            locator: RecordLocator::new(options.name_match),
        }
    }

    pub fn options(&self) -> ApplyOptions {
        self.options
    }

    /// Apply every section of `definition` whose target file name matches
    /// the file name of `target`.
    ///
    /// Sections with an empty `file` attribute never match.
    pub fn apply_definition(&self, doc: &mut Value, definition: &DefinitionDocument, target: &str) -> ApplyReport {
        let file_name = mod_file_name(target);
        let mut report = ApplyReport::default();
        let mut matched = 0;

        for section in definition.sections_for(file_name) {
            matched += 1;
            report.merge(self.apply_section(doc, section));
        }

        if matched == 0 {
            tracing::debug!("No <mod> section targets {}", file_name);
        }
        report
    }

    /// Apply one section's directives in order
    pub fn apply_section(&self, doc: &mut Value, section: &ModSection) -> ApplyReport {
        let mut report = ApplyReport::default();

        for (index, directive) in section.directives.iter().enumerate() {
            match self.apply_directive(doc, directive) {
                Ok(applied) => report.record(applied),
                Err(reason) => {
                    let skipped = SkippedDirective {
                        section: section.file.clone(),
                        index,
                        kind: directive.kind(),
                        item: directive_item(directive),
                        reason,
                    };
                    if matches!(skipped.reason, SkipReason::InvalidPayload { .. }) {
                        tracing::warn!("Skipped {}", skipped);
                    } else {
                        tracing::debug!("Skipped {}", skipped);
                    }
                    report.skipped.push(skipped);
                }
            }
        }

        report
    }

    /// Apply a single directive
    ///
    /// # Errors
    /// Returns the reason the directive was skipped. The document is left
    /// untouched in that case.
    pub fn apply_directive(&self, doc: &mut Value, directive: &Directive) -> Result<Applied, SkipReason> {
        match directive {
            Directive::AddImports { payload } => add_imports(doc, payload),
            Directive::AddRow { name, payload } => self.add_row(doc, name, payload),
            Directive::Change(change) if is_tag_container(&change.property) => change_tags(doc, change),
            Directive::Change(change) => self.change_property(doc, change),
            Directive::Delete(delete) => delete_tag(doc, delete),
        }
    }

    fn add_row(&self, doc: &mut Value, name: &str, payload: &str) -> Result<Applied, SkipReason> {
        if name.is_empty() {
            return Err(SkipReason::MissingField { field: "name" });
        }
        if name == NONE_ITEM {
            return Err(SkipReason::TemplateItem);
        }
        if payload.trim().is_empty() {
            return Err(SkipReason::MissingField { field: "payload" });
        }

        let row: Value = serde_json::from_str(payload).map_err(invalid_payload)?;
        if !row.is_object() {
            return Err(SkipReason::InvalidPayload {
                message: "expected a JSON object".to_string(),
            });
        }

        let rows = rows_for_mut(doc, name).ok_or(SkipReason::NoTable)?;
        match upsert_row(rows, name, row, self.options.overwrite_rows) {
            UpsertResult::Skipped => Err(SkipReason::RowExists),
            result => Ok(Applied::Row(result)),
        }
    }

    fn change_property(&self, doc: &mut Value, change: &Change) -> Result<Applied, SkipReason> {
        check_target(&change.item, &change.property)?;
        let path = PropertyPath::parse(&change.property).ok_or(SkipReason::MissingField { field: "property" })?;

        let properties = self
            .locator
            .find(doc, &change.item)
            .map_err(SkipReason::RecordNotFound)?;

        if path.resolve(properties).is_none() {
            return Err(SkipReason::PathNotFound {
                path: path.to_string(),
            });
        }
        let slot = path
            .resolve_slot(properties)
            .ok_or_else(|| SkipReason::PropertyNotFound {
                property: path.leaf().to_string(),
            })?;

        let value = coerce(slot.get("Value"), &change.value);
        let previous = slot.insert("Value".to_string(), value).unwrap_or(Value::Null);
        let current = slot.get("Value").cloned().unwrap_or(Value::Null);
        tracing::info!("Changed {}.{}: {} -> {}", change.item, change.property, previous, current);
        Ok(Applied::Property)
    }
}

fn add_imports(doc: &mut Value, payload: &str) -> Result<Applied, SkipReason> {
    if payload.trim().is_empty() {
        return Err(SkipReason::MissingField { field: "payload" });
    }
    let entries: Vec<Value> = serde_json::from_str(payload).map_err(invalid_payload)?;
    let imports = doc
        .get_mut("Imports")
        .and_then(Value::as_array_mut)
        .ok_or(SkipReason::NoImports)?;
    Ok(Applied::Imports(merge_imports(imports, entries)))
}

/// Tag replacement: drop `original` if given, then add `value`
fn change_tags(doc: &mut Value, change: &Change) -> Result<Applied, SkipReason> {
    check_target(&change.item, &change.property)?;
    let original = change.original.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let tag = change.value.trim();
    if tag.is_empty() && original.is_none() {
        return Err(SkipReason::MissingField { field: "value" });
    }

    let tags = tag_list_mut(doc, &change.item, &change.property).ok_or(SkipReason::TagListNotFound)?;
    if let Some(original) = original
        && remove_tag(tags, original)
    {
        tracing::info!("Removed tag {} from {}.{}", original, change.item, change.property);
    }
    if !tag.is_empty() && add_tag(tags, tag) {
        tracing::info!("Added tag {} to {}.{}", tag, change.item, change.property);
    }
    Ok(Applied::Tags)
}

fn delete_tag(doc: &mut Value, delete: &Delete) -> Result<Applied, SkipReason> {
    check_target(&delete.item, &delete.property)?;
    if !is_tag_container(&delete.property) {
        return Err(SkipReason::NotTagContainer {
            property: delete.property.clone(),
        });
    }
    let tag = delete.value.trim();
    if tag.is_empty() {
        return Err(SkipReason::MissingField { field: "value" });
    }

    let tags = tag_list_mut(doc, &delete.item, &delete.property).ok_or(SkipReason::TagListNotFound)?;
    if !remove_tag(tags, tag) {
        return Err(SkipReason::TagNotPresent { tag: tag.to_string() });
    }
    tracing::info!("Removed tag {} from {}.{}", tag, delete.item, delete.property);
    Ok(Applied::Tags)
}

/// Common checks for directives addressing `item`/`property`
fn check_target(item: &str, property: &str) -> Result<(), SkipReason> {
    if item == NONE_ITEM {
        return Err(SkipReason::TemplateItem);
    }
    if item.is_empty() {
        return Err(SkipReason::MissingField { field: "item" });
    }
    if property.is_empty() {
        return Err(SkipReason::MissingField { field: "property" });
    }
    Ok(())
}

fn invalid_payload(err: serde_json::Error) -> SkipReason {
    SkipReason::InvalidPayload {
        message: err.to_string(),
    }
}

fn directive_item(directive: &Directive) -> Option<String> {
    match directive {
        Directive::AddImports { .. } => None,
        Directive::AddRow { name, .. } => Some(name.clone()),
        Directive::Change(change) => Some(change.item.clone()),
        Directive::Delete(delete) => Some(delete.item.clone()),
    }
}
