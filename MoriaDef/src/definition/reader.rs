//! `.def` file reading
//!
//! ```xml
//! <definition>
//!   <title>Bigger Torches</title>
//!   <author>Someone</author>
//!   <description>Torches burn longer</description>
//!   <mod file="\Moria\Content\Tech\Data\Items\DT_Items.json">
//!     <add_imports><![CDATA[[{"ObjectName": "..."}]]]></add_imports>
//!     <add_row name="Lantern"><![CDATA[{"Name": "Lantern", "Value": []}]]></add_row>
//!     <change item="Torch" property="BurnTime" value="25"/>
//!     <delete item="Dwarf.Inventory" property="ExcludeItems" value="Item.Brew"/>
//!   </mod>
//! </definition>
//! ```
//!
//! Unknown elements are ignored along with their content.

use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::types::{Change, Delete, DefinitionDocument, Directive, ModSection};
use crate::error::{Error, Result};

const ROOT: &[u8] = b"definition";

/// Read a `.def` file from disk
///
/// # Errors
/// Returns an error if the file cannot be read, is not well-formed XML, or
/// its root element is not `<definition>`.
pub fn read_definition<P: AsRef<Path>>(path: P) -> Result<DefinitionDocument> {
    let content = fs::read_to_string(path)?;
    parse_definition(&content)
}

/// Where a text/CDATA capture ends up once its element closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Title,
    Author,
    Description,
    AddImports,
    AddRow,
}

#[derive(Debug)]
struct OpenCapture {
    target: Capture,
    /// Element depth of the capturing element
    depth: usize,
    text: String,
    /// `name` attribute of `<add_row>`
    row_name: String,
}

/// Parse a definition from an XML string
///
/// # Errors
/// Returns an error if the XML is malformed, text appears outside the root,
/// or the root element is not `<definition>`.
pub fn parse_definition(content: &str) -> Result<DefinitionDocument> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut doc = DefinitionDocument::default();
    let mut buf = Vec::new();

    // Names of currently open elements, root first
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut seen_root = false;
    let mut section: Option<ModSection> = None;
    let mut capture: Option<OpenCapture> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                open_element(&e, stack.len(), &mut seen_root, &mut section, &mut capture)?;
                stack.push(name);
            }
            Event::Empty(e) => {
                let depth = stack.len();
                open_element(&e, depth, &mut seen_root, &mut section, &mut capture)?;
                close_element(e.name().as_ref(), depth, &mut doc, &mut section, &mut capture);
            }
            Event::End(_) => {
                let name = stack.pop().unwrap_or_default();
                close_element(&name, stack.len(), &mut doc, &mut section, &mut capture);
            }
            Event::Text(e) => {
                if stack.is_empty() {
                    return Err(Error::definition("text outside the <definition> element"));
                }
                if let Some(open) = capture.as_mut()
                    && open.depth + 1 == stack.len()
                {
                    open.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(open) = capture.as_mut()
                    && open.depth + 1 == stack.len()
                {
                    open.text.push_str(&String::from_utf8(e.into_inner().into_owned())?);
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::definition(format!(
            "unexpected end of document inside <{}>",
            String::from_utf8_lossy(open)
        )));
    }
    if !seen_root {
        return Err(Error::definition("missing <definition> root element"));
    }

    Ok(doc)
}

/// Handle a start (or self-closing) tag at `depth` (0 = root)
fn open_element(
    e: &BytesStart,
    depth: usize,
    seen_root: &mut bool,
    section: &mut Option<ModSection>,
    capture: &mut Option<OpenCapture>,
) -> Result<()> {
    let name = e.name();
    let name = name.as_ref();

    if depth == 0 {
        if *seen_root {
            return Err(Error::definition("more than one root element"));
        }
        if name != ROOT {
            return Err(Error::definition(format!(
                "expected <definition> root element, found <{}>",
                String::from_utf8_lossy(name)
            )));
        }
        *seen_root = true;
        return Ok(());
    }

    if capture.is_some() {
        return Ok(());
    }

    let start_capture = |target: Capture, row_name: String| OpenCapture {
        target,
        depth,
        text: String::new(),
        row_name,
    };

    match (depth, name) {
        (1, b"title") => *capture = Some(start_capture(Capture::Title, String::new())),
        (1, b"author") => *capture = Some(start_capture(Capture::Author, String::new())),
        (1, b"description") => {
            *capture = Some(start_capture(Capture::Description, String::new()));
        }
        (1, b"mod") => {
            *section = Some(ModSection::new(attribute(e, b"file")?.unwrap_or_default()));
        }
        (2, b"add_imports") if section.is_some() => {
            *capture = Some(start_capture(Capture::AddImports, String::new()));
        }
        (2, b"add_row") if section.is_some() => {
            let row_name = attribute(e, b"name")?.unwrap_or_default();
            *capture = Some(start_capture(Capture::AddRow, row_name));
        }
        (2, b"change") => {
            if let Some(section) = section.as_mut() {
                section.push(Directive::Change(Change {
                    item: attribute(e, b"item")?.unwrap_or_default(),
                    property: attribute(e, b"property")?.unwrap_or_default(),
                    value: attribute(e, b"value")?.unwrap_or_default(),
                    original: attribute(e, b"original")?,
                }));
            }
        }
        (2, b"delete") => {
            if let Some(section) = section.as_mut() {
                section.push(Directive::Delete(Delete {
                    item: attribute(e, b"item")?.unwrap_or_default(),
                    property: attribute(e, b"property")?.unwrap_or_default(),
                    value: attribute(e, b"value")?.unwrap_or_default(),
                }));
            }
        }
        _ => {}
    }

    Ok(())
}

/// Handle an end tag (or the end of a self-closing tag) at `depth`
fn close_element(
    name: &[u8],
    depth: usize,
    doc: &mut DefinitionDocument,
    section: &mut Option<ModSection>,
    capture: &mut Option<OpenCapture>,
) {
    if let Some(open) = capture.take_if(|open| open.depth == depth) {
        let text = open.text.trim().to_string();
        match open.target {
            Capture::Title => doc.title = Some(text),
            Capture::Author => doc.author = Some(text),
            Capture::Description => doc.description = Some(text),
            Capture::AddImports => {
                if let Some(section) = section.as_mut() {
                    section.push(Directive::AddImports { payload: text });
                }
            }
            Capture::AddRow => {
                if let Some(section) = section.as_mut() {
                    section.push(Directive::AddRow {
                        name: open.row_name,
                        payload: text,
                    });
                }
            }
        }
        return;
    }

    if depth == 1
        && name == b"mod"
        && let Some(finished) = section.take()
    {
        doc.sections.push(finished);
    }
}

/// Unescaped value of attribute `key`
fn attribute(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::types::DirectiveKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_definition() {
        let content = r#"<?xml version="1.0" encoding="utf-8"?>
<definition>
    <title>Bigger Torches</title>
    <author>Test Author</author>
    <description>Test Description</description>
    <mod file="\Moria\Content\DT_Items.json">
        <add_imports><![CDATA[[{"ObjectName":"Icon_Lantern"}]]]></add_imports>
        <add_row name="Lantern">
            <![CDATA[{"Name":"Lantern","Value":[]}]]>
        </add_row>
        <change item="Torch" property="BurnTime" value="25" />
        <delete item="Dwarf.Inventory" property="ExcludeItems" value="Item.Brew"/>
    </mod>
</definition>"#;

        let doc = parse_definition(content).unwrap();
        assert_eq!(doc.title.as_deref(), Some("Bigger Torches"));
        assert_eq!(doc.author.as_deref(), Some("Test Author"));
        assert_eq!(doc.description.as_deref(), Some("Test Description"));
        assert_eq!(doc.sections.len(), 1);

        let section = &doc.sections[0];
        assert_eq!(section.file, "\\Moria\\Content\\DT_Items.json");
        assert_eq!(
            section.directives,
            vec![
                Directive::AddImports {
                    payload: r#"[{"ObjectName":"Icon_Lantern"}]"#.to_string()
                },
                Directive::AddRow {
                    name: "Lantern".to_string(),
                    payload: r#"{"Name":"Lantern","Value":[]}"#.to_string()
                },
                Directive::Change(Change::new("Torch", "BurnTime", "25")),
                Directive::Delete(Delete {
                    item: "Dwarf.Inventory".to_string(),
                    property: "ExcludeItems".to_string(),
                    value: "Item.Brew".to_string(),
                }),
            ]
        );
    }

    #[test]
    fn test_parse_minimal_definition() {
        let doc = parse_definition(
            r#"<definition>
    <mod file="\Test.json">
    </mod>
</definition>"#,
        )
        .unwrap();

        assert_eq!(doc.title, None);
        assert_eq!(doc.author, None);
        assert_eq!(doc.sections, vec![ModSection::new("\\Test.json")]);
    }

    #[test]
    fn test_directives_keep_file_order() {
        let doc = parse_definition(
            r#"<definition><mod file="a.json">
                <change item="A" property="P" value="1"/>
                <add_row name="B">{"Name":"B","Value":[]}</add_row>
                <change item="A" property="P" value="2"/>
            </mod></definition>"#,
        )
        .unwrap();

        let kinds: Vec<_> = doc.sections[0].directives.iter().map(Directive::kind).collect();
        assert_eq!(
            kinds,
            vec![DirectiveKind::Change, DirectiveKind::AddRow, DirectiveKind::Change]
        );
    }

    #[test]
    fn test_multiple_sections_and_missing_attributes() {
        let doc = parse_definition(
            r#"<definition>
                <mod file="a.json"><change item="X"/></mod>
                <mod><change property="Y" value="1" original="Item.Old"/></mod>
            </definition>"#,
        )
        .unwrap();

        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[1].file, "");
        assert_eq!(
            doc.sections[0].directives[0],
            Directive::Change(Change::new("X", "", ""))
        );
        let Directive::Change(change) = &doc.sections[1].directives[0] else {
            panic!("expected change");
        };
        assert_eq!(change.original.as_deref(), Some("Item.Old"));
    }

    #[test]
    fn test_entities_are_unescaped() {
        let doc = parse_definition(
            r#"<definition><title>Salt &amp; Pepper</title>
               <mod file="a.json"><change item="A&lt;B" property="P" value="&quot;q&quot;"/></mod>
               </definition>"#,
        )
        .unwrap();

        assert_eq!(doc.title.as_deref(), Some("Salt & Pepper"));
        assert_eq!(
            doc.sections[0].directives[0],
            Directive::Change(Change::new("A<B", "P", "\"q\""))
        );
    }

    #[test]
    fn test_unknown_elements_ignored() {
        let doc = parse_definition(
            r#"<definition><notes><title>Not the title</title></notes>
               <mod file="a.json"><comment>hi</comment></mod></definition>"#,
        )
        .unwrap();

        assert_eq!(doc.title, None);
        assert!(doc.sections[0].directives.is_empty());
    }

    #[test]
    fn test_invalid_xml() {
        assert!(parse_definition("not valid xml <><><").is_err());
        assert!(parse_definition("<definition><mod file=\"a\"></definition>").is_err());
        assert!(parse_definition("<definition><mod file=\"a\">").is_err());
        assert!(parse_definition("").is_err());
    }

    #[test]
    fn test_wrong_root() {
        let err = parse_definition("<save><mod file=\"a.json\"/></save>").unwrap_err();
        assert!(matches!(err, Error::InvalidDefinition { .. }));
    }
}
