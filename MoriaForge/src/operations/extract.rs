//! Baseline extraction: convert unpacked game assets to JSON
//!
//! Every `.uasset`/`.umap` under the source directory is converted with
//! `<converter> tojson <asset> <dest> <engine version>`, where `dest` mirrors
//! the asset's relative path under the baseline JSON directory. Assets that
//! already have a JSON file are skipped.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::build::tools::{run_tool, tool_name};
use crate::config::ForgeConfig;
use crate::error::{Error, Result};

/// Extensions of assets the converter can export
pub const ASSET_EXTENSIONS: &[&str] = &["uasset", "umap"];

/// Progress callback type for extraction
pub type ExtractProgressCallback<'a> = &'a (dyn Fn(&ExtractProgress) + Sync + Send);

/// Progress information during extraction
#[derive(Debug, Clone)]
pub struct ExtractProgress {
    pub current: usize,
    pub total: usize,
    /// Asset path relative to the source directory
    pub file: String,
}

/// Result of an extraction run
#[derive(Debug, Clone, Default)]
pub struct ExtractReport {
    pub converted: usize,
    /// Assets whose JSON already existed
    pub skipped: usize,
    /// Assets that could not be converted, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl ExtractReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

enum Outcome {
    Converted,
    Skipped,
    Failed(String),
}

/// Find all convertible assets under `dir`, sorted
pub fn find_asset_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut assets: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.path().is_file()
                && e.path().extension().is_some_and(|ext| {
                    ASSET_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                })
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    assets.sort();
    assets
}

/// Convert the assets under `source_dir` into the baseline JSON directory
pub fn extract_json(config: &ForgeConfig, source_dir: &Path) -> Result<ExtractReport> {
    extract_json_with_progress(config, source_dir, &|_| {})
}

/// Convert the assets under `source_dir` with progress callback.
///
/// Fails up front if the source directory or the converter is missing.
/// Failures of single assets are collected in the report.
pub fn extract_json_with_progress(
    config: &ForgeConfig,
    source_dir: &Path,
    progress: ExtractProgressCallback,
) -> Result<ExtractReport> {
    if !source_dir.is_dir() {
        return Err(Error::SourceNotFound {
            path: source_dir.to_path_buf(),
        });
    }
    let converter = config.converter_path();
    if !converter.is_file() {
        return Err(Error::ToolNotFound {
            tool: tool_name(&converter),
            path: converter,
        });
    }

    let assets = find_asset_files(source_dir);
    let total = assets.len();
    tracing::info!(
        "Extracting {} asset(s) from {} to {}",
        total,
        source_dir.display(),
        config.jsondata_dir.display()
    );

    let processed = AtomicUsize::new(0);
    let outcomes: Vec<(PathBuf, Outcome)> = assets
        .par_iter()
        .map(|asset| {
            let relative = asset.strip_prefix(source_dir).unwrap_or(asset.as_path());
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&ExtractProgress {
                current,
                total,
                file: relative.to_string_lossy().into_owned(),
            });

            let dest = config.jsondata_dir.join(relative).with_extension("json");
            (asset.clone(), convert_asset(config, &converter, asset, &dest))
        })
        .collect();

    let mut report = ExtractReport::default();
    for (asset, outcome) in outcomes {
        match outcome {
            Outcome::Converted => report.converted += 1,
            Outcome::Skipped => report.skipped += 1,
            Outcome::Failed(reason) => {
                tracing::warn!("Failed to extract {}: {}", asset.display(), reason);
                report.failed.push((asset, reason));
            }
        }
    }

    tracing::info!(
        "Extraction finished: {} converted, {} skipped, {} failed",
        report.converted,
        report.skipped,
        report.failed.len()
    );
    Ok(report)
}

fn convert_asset(config: &ForgeConfig, converter: &Path, asset: &Path, dest: &Path) -> Outcome {
    if dest.exists() {
        tracing::debug!("Skipping {}, already extracted", asset.display());
        return Outcome::Skipped;
    }
    if let Some(parent) = dest.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        return Outcome::Failed(e.to_string());
    }

    let args = [
        OsStr::new("tojson"),
        asset.as_os_str(),
        dest.as_os_str(),
        OsStr::new(&config.converter_engine_version),
    ];
    match run_tool(converter, args, None, config.tool_timeout()) {
        Ok(_) if dest.is_file() => Outcome::Converted,
        Ok(_) => Outcome::Failed(format!("{} produced no output", tool_name(converter))),
        Err(e) => Outcome::Failed(e.to_string()),
    }
}
