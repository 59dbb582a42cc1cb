//! Apply a single definition to a single baseline JSON file

use std::path::Path;

use moriadef::definition::read_definition;
use moriadef::json::{read_document, write_document};
use moriadef::patch::{ApplyOptions, ApplyReport, PatchEngine};

use crate::error::Result;

/// Apply every `<mod>` section of `def_file` that targets `json_file`'s file
/// name, then write the result to `output` (or back over `json_file`).
///
/// Records are matched by their exact name. `overwrite` controls whether
/// `add_row` replaces rows that already exist.
pub fn apply_def_to_json(
    def_file: impl AsRef<Path>,
    json_file: impl AsRef<Path>,
    output: Option<&Path>,
    overwrite: bool,
) -> Result<ApplyReport> {
    let def_file = def_file.as_ref();
    let json_file = json_file.as_ref();
    tracing::info!("Applying {} to {}", def_file.display(), json_file.display());

    let definition = read_definition(def_file)?;
    let mut doc = read_document(json_file)?;

    let target = json_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let engine = PatchEngine::new(ApplyOptions::standalone().with_overwrite(overwrite));
    let report = engine.apply_definition(&mut doc, &definition, &target);

    let output = output.unwrap_or(json_file);
    write_document(output, &doc)?;
    tracing::info!("Wrote {} ({})", output.display(), report);

    Ok(report)
}
