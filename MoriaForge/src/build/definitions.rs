//! Applying definitions to working copies of the baseline JSON

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use moriadef::definition::read_definition;
use moriadef::json::{read_document, write_document};
use moriadef::patch::{ApplyOptions, PatchEngine};
use moriadef::utils::resolve_mod_path;

use super::layout::ModLayout;
use super::types::ProcessedDefinition;
use crate::error::{Error, Result};

/// Apply the first `<mod>` section of `def_file` to its target file.
///
/// The target is copied from `jsondata_dir` into the mod's `jsonfiles`
/// directory on first use, replacing anything already there. Targets listed
/// in `copied` were copied earlier in the same build and are patched in
/// place, so several definitions can edit one table.
pub fn process_definition(
    def_file: &Path,
    jsondata_dir: &Path,
    layout: &ModLayout,
    copied: &mut HashSet<PathBuf>,
) -> Result<ProcessedDefinition> {
    let definition = read_definition(def_file)?;
    let display_name = def_file.display();

    let Some(section) = definition.sections.first() else {
        return Err(Error::Build(format!("No <mod> element in {display_name}")));
    };
    if section.file.is_empty() {
        return Err(Error::Build(format!(
            "No file attribute in <mod> element of {display_name}"
        )));
    }

    let target = section.relative_path();
    let dest = resolve_mod_path(layout.jsonfiles_dir(), &section.file);

    if copied.contains(&dest) {
        tracing::debug!("Reusing working copy {}", dest.display());
    } else {
        let source = resolve_mod_path(jsondata_dir, &section.file);
        if !source.is_file() {
            tracing::error!("Source file not found: {}", source.display());
            return Err(Error::SourceNotFound { path: source });
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, &dest)?;
        copied.insert(dest.clone());
    }

    let mut doc = read_document(&dest)?;
    let engine = PatchEngine::new(ApplyOptions::default());
    let report = engine.apply_section(&mut doc, section);
    write_document(&dest, &doc)?;

    tracing::info!("{}: {} -> {}", def_file.display(), target, report);
    Ok(ProcessedDefinition {
        definition: def_file.to_path_buf(),
        target,
        report,
    })
}
