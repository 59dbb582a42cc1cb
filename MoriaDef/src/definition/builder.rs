//! Assembling definitions programmatically
//!
//! Used for "construction packs": many `add_row` fragments bundled into one
//! definition, with every fragment's imports folded into a single
//! de-duplicated `add_imports` per target file.

use serde_json::Value;

use super::types::{Change, DefinitionDocument, Directive, ModSection};
use crate::patch::imports::combine_import_fragments;

/// Builder for a [`DefinitionDocument`]
#[derive(Debug, Clone, Default)]
pub struct DefinitionBuilder {
    title: Option<String>,
    author: Option<String>,
    description: Option<String>,
    sections: Vec<PendingSection>,
}

#[derive(Debug, Clone)]
struct PendingSection {
    file: String,
    import_fragments: Vec<String>,
    directives: Vec<Directive>,
}

impl DefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn section_mut(&mut self, file: &str) -> &mut PendingSection {
        let index = match self.sections.iter().position(|s| s.file == file) {
            Some(index) => index,
            None => {
                self.sections.push(PendingSection {
                    file: file.to_string(),
                    import_fragments: Vec::new(),
                    directives: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    /// Queue an `add_imports` payload for `file`; merged at [`build`](Self::build)
    #[must_use]
    pub fn imports(mut self, file: &str, payload: impl Into<String>) -> Self {
        self.section_mut(file).import_fragments.push(payload.into());
        self
    }

    /// Add a row to `file`, named after the payload's `Name` field
    ///
    /// Payloads without a string `Name` fall back to `name`.
    #[must_use]
    pub fn row(mut self, file: &str, name: &str, payload: impl Into<String>) -> Self {
        let payload = payload.into();
        let name = serde_json::from_str::<Value>(&payload)
            .ok()
            .and_then(|row| row.get("Name").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| name.to_string());
        self.section_mut(file)
            .directives
            .push(Directive::AddRow { name, payload });
        self
    }

    #[must_use]
    pub fn change(mut self, file: &str, change: Change) -> Self {
        self.section_mut(file).directives.push(Directive::Change(change));
        self
    }

    /// Finish the definition.
    ///
    /// Sections keep the order their files were first mentioned in. Each
    /// section with queued imports starts with one combined `add_imports`.
    pub fn build(self) -> DefinitionDocument {
        let sections = self
            .sections
            .into_iter()
            .map(|pending| {
                let mut section = ModSection::new(pending.file);
                let imports = combine_import_fragments(pending.import_fragments.iter().map(String::as_str));
                if !imports.is_empty() {
                    let payload = serde_json::to_string_pretty(&imports).unwrap_or_default();
                    section.push(Directive::AddImports { payload });
                }
                section.directives.extend(pending.directives);
                section
            })
            .collect();

        DefinitionDocument {
            title: self.title,
            author: self.author,
            description: self.description,
            sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::types::DirectiveKind;
    use pretty_assertions::assert_eq;

    const ITEMS: &str = "Moria\\Content\\Tech\\Data\\Items\\DT_Items.json";

    #[test]
    fn test_build_construction_pack() {
        let doc = DefinitionBuilder::new()
            .title("Pack")
            .imports(ITEMS, r#"[{"ObjectName": "Icon_A"}, {"ObjectName": "Icon_B"}]"#)
            .row(ITEMS, "Wall", r#"{"Name": "Stone_Wall", "Value": []}"#)
            .imports(ITEMS, r#"[{"ObjectName": "Icon_B"}, {"ClassName": "Anonymous"}]"#)
            .row(ITEMS, "Floor", "not json")
            .change("DT_Storage.json", Change::new("Chest", "Slots", "40"))
            .build();

        assert_eq!(doc.title.as_deref(), Some("Pack"));
        assert_eq!(doc.sections.len(), 2);

        let items = &doc.sections[0];
        let kinds: Vec<_> = items.directives.iter().map(Directive::kind).collect();
        assert_eq!(kinds, vec![DirectiveKind::AddImports, DirectiveKind::AddRow, DirectiveKind::AddRow]);

        let Directive::AddImports { payload } = &items.directives[0] else {
            panic!("expected add_imports first");
        };
        let imports: Vec<Value> = serde_json::from_str(payload).unwrap();
        let names: Vec<_> = imports.iter().map(|i| i["ObjectName"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Icon_A", "Icon_B"]);

        let Directive::AddRow { name, .. } = &items.directives[1] else {
            panic!("expected add_row");
        };
        assert_eq!(name, "Stone_Wall");
        let Directive::AddRow { name, .. } = &items.directives[2] else {
            panic!("expected add_row");
        };
        assert_eq!(name, "Floor");
    }

    #[test]
    fn test_no_imports_no_directive() {
        let doc = DefinitionBuilder::new()
            .change("DT_Storage.json", Change::new("Chest", "Slots", "40"))
            .build();
        assert_eq!(doc.sections[0].directives.len(), 1);
        assert_eq!(doc.title, None);
    }
}
