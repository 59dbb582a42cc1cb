//! CLI command for extracting baseline JSON from game assets

use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::ProgressBar;

use crate::cli::progress::{GEAR, LOOKING_GLASS, percent_style, print_done, print_step};
use crate::config::ForgeConfig;
use crate::operations::{ExtractProgress, extract_json_with_progress};

pub fn execute(source: Option<&Path>, config_path: Option<&Path>) -> anyhow::Result<()> {
    let started = Instant::now();

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
    let source: PathBuf = source.map_or_else(|| config.retoc_dir(), Path::to_path_buf);

    print_step(
        2,
        2,
        GEAR,
        &format!(
            "Extracting {} to {}...",
            source.display(),
            config.jsondata_dir.display()
        ),
    );
    let pb = ProgressBar::new(0);
    pb.set_style(percent_style());
    let result = extract_json_with_progress(&config, &source, &|progress: &ExtractProgress| {
        pb.set_length(progress.total as u64);
        pb.set_position(progress.current as u64);
        pb.set_message(progress.file.clone());
    });
    pb.finish_and_clear();
    let report = result?;

    for (asset, reason) in &report.failed {
        println!("  failed: {}: {}", asset.display(), reason);
    }
    println!(
        "  Converted {}, skipped {} existing, failed {}",
        report.converted,
        report.skipped,
        report.failed.len()
    );

    print_done(started.elapsed());
    if !report.is_clean() {
        anyhow::bail!("{} asset(s) could not be extracted", report.failed.len());
    }
    Ok(())
}
