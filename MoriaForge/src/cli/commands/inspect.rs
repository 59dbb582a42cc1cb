//! CLI command for showing a definition file

use std::path::Path;

use moriadef::definition::{Directive, read_definition};

pub fn execute(def: &Path, as_json: bool) -> anyhow::Result<()> {
    let definition = read_definition(def)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&definition)?);
        return Ok(());
    }

    let stem = def
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!("{}", definition.display_title(&stem));
    if let Some(author) = &definition.author {
        println!("  Author: {author}");
    }
    if let Some(description) = &definition.description {
        println!("  Description: {description}");
    }
    println!(
        "  {} section(s), {} directive(s)",
        definition.sections.len(),
        definition.directive_count()
    );

    for section in &definition.sections {
        println!();
        println!("[{}]", section.relative_path());
        for (i, directive) in section.directives.iter().enumerate() {
            println!("  {:>3}. {}", i + 1, describe(directive));
        }
    }

    Ok(())
}

fn describe(directive: &Directive) -> String {
    match directive {
        Directive::AddImports { payload } => format!("add_imports ({} bytes)", payload.len()),
        Directive::AddRow { name, .. } => format!("add_row {name}"),
        Directive::Change(change) => match &change.original {
            Some(original) => format!(
                "change {}.{}: {} -> {}",
                change.item, change.property, original, change.value
            ),
            None => format!("change {}.{} = {}", change.item, change.property, change.value),
        },
        Directive::Delete(delete) => {
            format!("delete {}.{} -= {}", delete.item, delete.property, delete.value)
        }
    }
}
