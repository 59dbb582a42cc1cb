//! CLI command for applying a definition to one JSON file

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{DISK, GEAR, print_done, print_step};
use crate::operations::apply_def_to_json;

pub fn execute(def: &Path, json: &Path, output: Option<&Path>, overwrite: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    print_step(
        1,
        2,
        GEAR,
        &format!("Applying {} to {}...", def.display(), json.display()),
    );

    let report = apply_def_to_json(def, json, output, overwrite)?;

    print_step(
        2,
        2,
        DISK,
        &format!("Wrote {}", output.unwrap_or(json).display()),
    );
    println!("  {report}");
    for skipped in &report.skipped {
        println!("  skipped: {skipped}");
    }
    if report.total() == 0 {
        println!("  No directives in {} target {}", def.display(), json.display());
    }

    print_done(started.elapsed());
    Ok(())
}
