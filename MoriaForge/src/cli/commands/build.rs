//! CLI command for building a mod archive

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::build::{BuildManager, BuildProgress};
use crate::cli::progress::{LOOKING_GLASS, PACKAGE, percent_bar, print_done, print_step};
use crate::config::ForgeConfig;

pub fn execute(mod_name: &str, defs: &[PathBuf], config_path: Option<&Path>) -> anyhow::Result<()> {
    let started = Instant::now();
    if mod_name.trim().is_empty() {
        anyhow::bail!("Mod name must not be empty");
    }

    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => ForgeConfig::default_path()?,
    };
    print_step(
        1,
        2,
        LOOKING_GLASS,
        &format!("Loading config from {}...", config_path.display()),
    );
    let config = ForgeConfig::load_or_default(&config_path)?;

    print_step(
        2,
        2,
        PACKAGE,
        &format!("Building {mod_name} from {} definition(s)...", defs.len()),
    );
    let pb = percent_bar("Starting...");
    let manager = BuildManager::new(config);
    let result = manager.build_with_progress(mod_name, defs, &|progress: &BuildProgress| {
        pb.set_position(progress.percent());
        pb.set_message(progress.message.clone());
    });
    pb.finish_and_clear();
    let report = result?;

    for processed in &report.definitions {
        println!(
            "  {} -> {}: {}",
            processed.definition.display(),
            processed.target,
            processed.report
        );
        for skipped in &processed.report.skipped {
            println!("    skipped: {skipped}");
        }
    }
    println!(
        "  Converted {} file(s), archived {} file(s)",
        report.converted, report.archived
    );
    println!("  Mod archive: {}", report.archive.display());

    print_done(started.elapsed());
    Ok(())
}
