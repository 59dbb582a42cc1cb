use moriadef::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::tempdir;

const ITEMS: &str = r"\Moria\Content\Tech\Data\Items\DT_Items.json";

fn definition(body: &str) -> DefinitionDocument {
    let xml = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<definition>
  <title>Test</title>
  <mod file="{ITEMS}">
{body}
  </mod>
</definition>"#
    );
    parse_definition(&xml).unwrap()
}

fn apply(doc: &mut Value, def: &DefinitionDocument, options: ApplyOptions) -> ApplyReport {
    PatchEngine::new(options).apply_definition(doc, def, "DT_Items.json")
}

fn torch_table() -> Value {
    json!({"Exports":[{"Table":{"Data":[{"Name":"Torch","Value":[{"Name":"BurnTime","Value":10}]}]}}]})
}

fn rows(doc: &Value) -> &Vec<Value> {
    doc["Exports"][0]["Table"]["Data"].as_array().unwrap()
}

#[test]
fn test_change_end_to_end() {
    let mut doc = torch_table();
    let def = definition(r#"<change item="Torch" property="BurnTime" value="25"/>"#);

    let report = apply(&mut doc, &def, ApplyOptions::standalone());

    assert_eq!(report.properties_changed, 1);
    let burn_time = &rows(&doc)[0]["Value"][0]["Value"];
    assert_eq!(burn_time, &json!(25));
    assert!(burn_time.is_i64());
}

#[test]
fn test_add_row_end_to_end() {
    let mut doc = torch_table();
    let before = rows(&doc).clone();
    let def = definition(r#"<add_row name="Lantern">{"Name":"Lantern","Value":[]}</add_row>"#);

    let report = apply(&mut doc, &def, ApplyOptions::default());

    assert_eq!(report.rows_inserted, 1);
    let after = rows(&doc);
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(&after[..before.len()], &before[..]);
    assert_eq!(after[before.len()], json!({"Name":"Lantern","Value":[]}));
}

#[test]
fn test_add_row_idempotent_with_overwrite() {
    let mut doc = torch_table();
    let def = definition(
        r#"<add_row name="Lantern"><![CDATA[{"Name":"Lantern","Value":[{"Name":"BurnTime","Value":40}]}]]></add_row>"#,
    );

    apply(&mut doc, &def, ApplyOptions::default());
    let report = apply(&mut doc, &def, ApplyOptions::default());

    assert_eq!(report.rows_updated, 1);
    let lanterns: Vec<_> = rows(&doc).iter().filter(|r| r["Name"] == "Lantern").collect();
    assert_eq!(lanterns.len(), 1);
    assert_eq!(
        lanterns[0],
        &json!({"Name":"Lantern","Value":[{"Name":"BurnTime","Value":40}]})
    );
}

#[test]
fn test_add_row_skip_without_overwrite() {
    let mut doc = torch_table();
    let original = rows(&doc)[0].clone();
    let def = definition(r#"<add_row name="Torch">{"Name":"Torch","Value":[]}</add_row>"#);

    let report = apply(&mut doc, &def, ApplyOptions::default().with_overwrite(false));

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::RowExists);
    assert_eq!(rows(&doc).len(), 1);
    assert_eq!(rows(&doc)[0], original);
}

#[test]
fn test_import_dedupe() {
    let mut doc = torch_table();
    doc["Imports"] = json!([{"ObjectName": "A", "ClassName": "Package"}]);
    let def = definition(
        r#"<add_imports><![CDATA[[
            {"ObjectName": "A", "ClassName": "Other"},
            {"ObjectName": "B"},
            {"ObjectName": "B", "ClassName": "Dup"},
            {"ObjectName": "C"}
        ]]]></add_imports>"#,
    );

    let report = apply(&mut doc, &def, ApplyOptions::default());

    assert_eq!(report.imports_added, 2);
    assert_eq!(
        doc["Imports"],
        json!([
            {"ObjectName": "A", "ClassName": "Package"},
            {"ObjectName": "B"},
            {"ObjectName": "C"}
        ])
    );
}

#[test]
fn test_type_fidelity() {
    let mut doc = json!({"Exports":[{"Table":{"Data":[{"Name":"Torch","Value":[
        {"Name":"Lit","Value":false},
        {"Name":"Weight","Value":1.0},
        {"Name":"BurnTime","Value":10},
        {"Name":"Fuel","Value":10}
    ]}]}}]});
    let def = definition(
        r#"
        <change item="Torch" property="Lit" value="TRUE"/>
        <change item="Torch" property="Weight" value="2.5"/>
        <change item="Torch" property="BurnTime" value="7.9"/>
        <change item="Torch" property="Fuel" value="7.4"/>"#,
    );

    apply(&mut doc, &def, ApplyOptions::default());

    let props = &rows(&doc)[0]["Value"];
    assert_eq!(props[0]["Value"], json!(true));
    assert_eq!(props[1]["Value"], json!(2.5));
    assert!(props[1]["Value"].is_f64());
    assert_eq!(props[2]["Value"], json!(8));
    assert_eq!(props[3]["Value"], json!(7));
}

#[test]
fn test_none_sentinel_never_mutates() {
    let mut doc = torch_table();
    doc["Exports"][0]["Table"]["Data"]
        .as_array_mut()
        .unwrap()
        .push(json!({"Name":"NONE","Value":[{"Name":"BurnTime","Value":1}]}));
    let before = doc.clone();
    let def = definition(
        r#"
        <change item="NONE" property="BurnTime" value="99"/>
        <delete item="NONE" property="ExcludeItems" value="Item.Ore"/>
        <add_row name="NONE">{"Name":"NONE","Value":[]}</add_row>"#,
    );

    let report = apply(&mut doc, &def, ApplyOptions::default());

    assert_eq!(doc, before);
    assert_eq!(report.applied, 0);
    assert!(report.skipped.iter().all(|s| s.reason == SkipReason::TemplateItem));
}

#[test]
fn test_decorated_precedence() {
    let mut doc = json!({"Exports":[
        {"ObjectName":"Foo_C","Data":[{"Name":"Speed","Value":1.0}]},
        {"ObjectName":"Default__Foo_C","Data":[{"Name":"Speed","Value":1.0}]}
    ]});
    let def = definition(r#"<change item="Foo" property="Speed" value="3.5"/>"#);

    apply(&mut doc, &def, ApplyOptions::default());

    assert_eq!(doc["Exports"][0]["Data"][0]["Value"], json!(1.0));
    assert_eq!(doc["Exports"][1]["Data"][0]["Value"], json!(3.5));
}

#[test]
fn test_exact_matching_ignores_decorations() {
    let mut doc = json!({"Exports":[
        {"ObjectName":"Default__Foo_C","Data":[{"Name":"Speed","Value":1.0}]}
    ]});
    let before = doc.clone();
    let def = definition(r#"<change item="Foo" property="Speed" value="3.5"/>"#);

    let report = apply(&mut doc, &def, ApplyOptions::standalone());

    assert_eq!(doc, before);
    assert_eq!(report.skipped.len(), 1);
}

#[test]
fn test_nested_path() {
    let mut doc = json!({"Exports":[{"Table":{"Data":[{"Name":"Torch","Value":[
        {"Name":"Outer","Value":[{"Name":"Inner","Value":5.0}]}
    ]}]}}]});
    let def = definition(r#"<change item="Torch" property="Outer.Inner" value="9.75"/>"#);

    apply(&mut doc, &def, ApplyOptions::default());

    let outer = &rows(&doc)[0]["Value"][0];
    assert!(outer["Value"].is_array());
    assert_eq!(outer["Value"][0]["Value"], json!(9.75));
}

#[test]
fn test_indexed_path() {
    let mut doc = json!({"Exports":[{"Table":{"Data":[{"Name":"Forge","Value":[
        {"Name":"StageDataList","Value":[
            {"Name":"0","Value":[{"Name":"PointsNeeded","Value":100}]},
            {"Name":"1","Value":[{"Name":"PointsNeeded","Value":200}]}
        ]}
    ]}]}}]});
    let def = definition(r#"<change item="Forge" property="StageDataList[1].PointsNeeded" value="50"/>"#);

    apply(&mut doc, &def, ApplyOptions::default());

    let stages = &rows(&doc)[0]["Value"][0]["Value"];
    assert_eq!(stages[0]["Value"][0]["Value"], json!(100));
    assert_eq!(stages[1]["Value"][0]["Value"], json!(50));
}

#[test]
fn test_directives_run_in_file_order() {
    let mut doc = torch_table();
    let def = definition(
        r#"
        <change item="Lantern" property="BurnTime" value="5"/>
        <add_row name="Lantern">{"Name":"Lantern","Value":[{"Name":"BurnTime","Value":1}]}</add_row>
        <change item="Lantern" property="BurnTime" value="30"/>"#,
    );

    let report = apply(&mut doc, &def, ApplyOptions::default());

    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 0);
    assert_eq!(rows(&doc)[1]["Value"][0]["Value"], json!(30));
}

#[test]
fn test_files_round_trip_on_disk() {
    let dir = tempdir().unwrap();
    let json_path = dir.path().join("DT_Items.json");
    let def_path = dir.path().join("torch.def");

    std::fs::write(&json_path, r#"{"Exports":[{"Table":{"Data":[{"Name":"Torch","Value":[{"Name":"Label","Value":"Fackel ü"}]}]}}]}"#).unwrap();
    definition(r#"<change item="Torch" property="Label" value="Lanterne é"/>"#)
        .write_to(&def_path)
        .unwrap();

    let def = read_definition(&def_path).unwrap();
    let mut doc = read_document(&json_path).unwrap();
    apply(&mut doc, &def, ApplyOptions::standalone());
    write_document(&json_path, &doc).unwrap();

    let written = std::fs::read_to_string(&json_path).unwrap();
    assert!(written.contains("Lanterne é"));
    assert!(written.contains("\n  \"Exports\""));
    assert_eq!(read_document(&json_path).unwrap(), doc);
}

#[test]
fn test_baseline_must_be_object() {
    assert!(matches!(parse_document("[1, 2]"), Err(Error::InvalidDocument { .. })));
    assert!(matches!(parse_document("{oops"), Err(Error::JsonError(_))));
}
