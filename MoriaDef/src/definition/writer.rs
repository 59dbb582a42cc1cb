//! `.def` file writing

use std::fs;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::types::{Change, Delete, DefinitionDocument, Directive, ModSection};
use crate::error::Result;

impl DefinitionDocument {
    /// Serialize to `.def` XML with 2-space indentation.
    ///
    /// `add_imports` and `add_row` payloads are wrapped in CDATA so the JSON
    /// stays readable.
    ///
    /// # Errors
    /// Returns an error if XML serialization fails.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("definition")))?;

        write_text_element(&mut writer, "title", self.title.as_deref())?;
        write_text_element(&mut writer, "author", self.author.as_deref())?;
        write_text_element(&mut writer, "description", self.description.as_deref())?;

        for section in &self.sections {
            write_section(&mut writer, section)?;
        }

        writer.write_event(Event::End(BytesEnd::new("definition")))?;

        let mut xml = String::from_utf8(writer.into_inner())?;
        xml.push('\n');
        Ok(xml)
    }

    /// Write the definition to disk as XML
    ///
    /// # Errors
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_xml()?)?;
        Ok(())
    }
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: Option<&str>) -> Result<()> {
    let Some(text) = text else {
        return Ok(());
    };
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_section(writer: &mut Writer<Vec<u8>>, section: &ModSection) -> Result<()> {
    let mut start = BytesStart::new("mod");
    start.push_attribute(("file", section.file.as_str()));

    if section.directives.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for directive in &section.directives {
        match directive {
            Directive::AddImports { payload } => {
                write_payload(writer, BytesStart::new("add_imports"), payload)?;
            }
            Directive::AddRow { name, payload } => {
                let mut start = BytesStart::new("add_row");
                start.push_attribute(("name", name.as_str()));
                write_payload(writer, start, payload)?;
            }
            Directive::Change(change) => write_change(writer, change)?,
            Directive::Delete(delete) => write_delete(writer, delete)?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new("mod")))?;
    Ok(())
}

fn write_payload(writer: &mut Writer<Vec<u8>>, start: BytesStart, payload: &str) -> Result<()> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    // CDATA cannot contain its own terminator
    if payload.contains("]]>") {
        writer.write_event(Event::Text(BytesText::new(payload)))?;
    } else {
        writer.write_event(Event::CData(BytesCData::new(payload)))?;
    }
    writer.write_event(Event::End(end))?;
    Ok(())
}

fn write_change(writer: &mut Writer<Vec<u8>>, change: &Change) -> Result<()> {
    let mut element = BytesStart::new("change");
    element.push_attribute(("item", change.item.as_str()));
    element.push_attribute(("property", change.property.as_str()));
    if let Some(original) = &change.original {
        element.push_attribute(("original", original.as_str()));
    }
    element.push_attribute(("value", change.value.as_str()));
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

fn write_delete(writer: &mut Writer<Vec<u8>>, delete: &Delete) -> Result<()> {
    let mut element = BytesStart::new("delete");
    element.push_attribute(("item", delete.item.as_str()));
    element.push_attribute(("property", delete.property.as_str()));
    element.push_attribute(("value", delete.value.as_str()));
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::parse_definition;
    use pretty_assertions::assert_eq;

    fn sample() -> DefinitionDocument {
        let mut section = ModSection::new("\\Moria\\Content\\Tech\\Data\\Items\\DT_Items.json");
        section
            .push(Directive::AddImports {
                payload: r#"[{"ObjectName": "Icon_Lantern"}]"#.to_string(),
            })
            .push(Directive::AddRow {
                name: "Lantern".to_string(),
                payload: r#"{"Name": "Lantern", "Value": []}"#.to_string(),
            })
            .push(Directive::Change(Change::new("Torch", "BurnTime", "25")))
            .push(Directive::Change(Change {
                original: Some("Item.Ore".to_string()),
                ..Change::new("Dwarf.Inventory", "ExcludeItems", "Item.Gem")
            }))
            .push(Directive::Delete(Delete {
                item: "Dwarf.Inventory".to_string(),
                property: "AllowedItems".to_string(),
                value: "Item.Brew".to_string(),
            }));

        DefinitionDocument {
            title: Some("Salt & <Pepper>".to_string()),
            author: Some("Someone".to_string()),
            description: None,
            sections: vec![section, ModSection::new("DT_Empty.json")],
        }
    }

    #[test]
    fn test_to_xml_round_trip() {
        let doc = sample();
        let xml = doc.to_xml().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<![CDATA[{\"Name\": \"Lantern\", \"Value\": []}]]>"));
        assert!(!xml.contains("<description>"));
        assert_eq!(parse_definition(&xml).unwrap(), doc);
    }

    #[test]
    fn test_payload_with_cdata_terminator() {
        let mut section = ModSection::new("DT_Odd.json");
        section.push(Directive::AddRow {
            name: "Odd".to_string(),
            payload: r#"{"Name": "Odd", "Note": "]]>"}"#.to_string(),
        });
        let doc = DefinitionDocument {
            sections: vec![section],
            ..Default::default()
        };

        let xml = doc.to_xml().unwrap();
        assert!(!xml.contains("<![CDATA["));
        assert_eq!(parse_definition(&xml).unwrap(), doc);
    }

    #[test]
    fn test_write_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("torches.def");
        sample().write_to(&path).unwrap();

        let read = crate::definition::read_definition(&path).unwrap();
        assert_eq!(read.display_title("torches"), "Salt & <Pepper>");
    }
}
