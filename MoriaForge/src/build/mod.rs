//! Mod build pipeline
//!
//! Turns a set of definitions into a distributable archive:
//!
//! 1. clean the mod's working directories
//! 2. apply each definition to a copy of its baseline JSON (0-40%)
//! 3. convert every patched JSON file to uasset (40-70%)
//! 4. repackage the uasset tree into `<mod>_P` (70-90%)
//! 5. zip `<mod>_P` into the output directory (90-100%)

pub mod archive;
pub mod definitions;
pub mod layout;
pub mod tools;
pub mod types;

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub use layout::ModLayout;
pub use types::{BuildPhase, BuildProgress, BuildProgressCallback, BuildReport, ProcessedDefinition};

use crate::config::ForgeConfig;
use crate::error::{Error, Result};

/// Builds mods according to a [`ForgeConfig`]
#[derive(Debug, Clone)]
pub struct BuildManager {
    config: ForgeConfig,
}

impl BuildManager {
    pub fn new(config: ForgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Working directories for `mod_name`
    pub fn layout(&self, mod_name: &str) -> ModLayout {
        ModLayout::new(&self.config.mymodfiles_dir, mod_name)
    }

    /// Build `mod_name` from `def_files`
    pub fn build(&self, mod_name: &str, def_files: &[PathBuf]) -> Result<BuildReport> {
        self.build_with_progress(mod_name, def_files, &|_| {})
    }

    /// Build `mod_name` from `def_files` with progress callback
    pub fn build_with_progress(
        &self,
        mod_name: &str,
        def_files: &[PathBuf],
        progress: BuildProgressCallback,
    ) -> Result<BuildReport> {
        if def_files.is_empty() {
            return Err(Error::NoDefinitions);
        }
        let report_progress = |update: BuildProgress| {
            tracing::info!("Build progress: {}% - {}", update.percent(), update.message);
            progress(&update);
        };
        let layout = self.layout(mod_name);

        report_progress(BuildProgress::new(
            BuildPhase::Cleaning,
            0.0,
            "Cleaning previous build files...",
        ));
        layout.clean()?;

        // Definitions (0-40%)
        let mut processed = Vec::with_capacity(def_files.len());
        let mut copied = HashSet::new();
        let mut failed = 0;
        for (i, def_file) in def_files.iter().enumerate() {
            report_progress(BuildProgress::within(
                BuildPhase::ProcessingDefinitions,
                0.0,
                0.4,
                i,
                def_files.len(),
                format!("Processing {}...", file_label(def_file)),
            ));
            match definitions::process_definition(def_file, &self.config.jsondata_dir, &layout, &mut copied) {
                Ok(definition) => processed.push(definition),
                Err(e) => {
                    tracing::error!("Error processing {}: {}", def_file.display(), e);
                    failed += 1;
                }
            }
        }
        if failed > 0 {
            return Err(Error::DefinitionsFailed {
                succeeded: processed.len(),
                failed,
            });
        }

        // Convert (40-70%)
        report_progress(BuildProgress::new(
            BuildPhase::Converting,
            0.4,
            "Converting to uasset format...",
        ));
        let converted = self.convert_json_files(&layout, &copied, &report_progress)?;

        // Package (70-90%)
        report_progress(BuildProgress::new(BuildPhase::Packaging, 0.7, "Packaging mod files..."));
        self.package(&layout)?;

        // Archive (90-100%)
        report_progress(BuildProgress::new(BuildPhase::Archiving, 0.9, "Creating zip file..."));
        let archive_path = self.config.output_dir.join(format!("{mod_name}.zip"));
        let archived = archive::create_archive(&layout.finalmod_dir(), &layout.packaged_dir(), &archive_path)?;

        report_progress(BuildProgress::new(BuildPhase::Complete, 1.0, "Build complete!"));

        Ok(BuildReport {
            mod_name: mod_name.to_string(),
            archive: archive_path,
            definitions: processed,
            converted,
            archived,
        })
    }

    /// Run the converter on every JSON file this build patched.
    ///
    /// Files under `jsonfiles` that this build did not copy are leftovers
    /// from an earlier build and are not converted.
    fn convert_json_files(
        &self,
        layout: &ModLayout,
        copied: &HashSet<PathBuf>,
        report_progress: &dyn Fn(BuildProgress),
    ) -> Result<usize> {
        let converter = self.config.converter_path();
        let json_dir = layout.jsonfiles_dir();
        let uasset_dir = layout.uasset_dir();
        fs::create_dir_all(&uasset_dir)?;

        let mut json_files = Vec::new();
        for entry in WalkDir::new(&json_dir).sort_by_file_name() {
            let entry = entry?;
            let is_json = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !entry.file_type().is_file() || !is_json {
                continue;
            }
            if copied.contains(entry.path()) {
                json_files.push(entry.into_path());
            } else {
                tracing::warn!("Ignoring leftover file {}", entry.path().display());
            }
        }
        if json_files.is_empty() {
            return Err(Error::Build("No JSON files found to convert".to_string()));
        }

        for (i, json_file) in json_files.iter().enumerate() {
            report_progress(BuildProgress::within(
                BuildPhase::Converting,
                0.4,
                0.7,
                i,
                json_files.len(),
                format!("Converting {}...", file_label(json_file)),
            ));

            let Ok(relative) = json_file.strip_prefix(&json_dir) else {
                continue;
            };
            let uasset_file = uasset_dir.join(relative).with_extension("uasset");
            if let Some(parent) = uasset_file.parent() {
                fs::create_dir_all(parent)?;
            }

            let output = tools::run_tool(
                &converter,
                [
                    OsStr::new("fromjson"),
                    json_file.as_os_str(),
                    uasset_file.as_os_str(),
                    OsStr::new(&self.config.converter_engine_version),
                ],
                None,
                self.config.tool_timeout(),
            )?;
            if !uasset_file.exists() {
                tracing::error!("Failed to convert {}: {}", file_label(json_file), output.stderr);
                return Err(Error::ToolFailed {
                    tool: tools::tool_name(&converter),
                    code: output.code,
                    stderr: format!("{} was not created", uasset_file.display()),
                });
            }
        }

        Ok(json_files.len())
    }

    /// Run the repackager over the uasset tree
    fn package(&self, layout: &ModLayout) -> Result<()> {
        fs::create_dir_all(layout.packaged_dir())?;
        // The repackager runs from the utilities directory
        let repackager = std::path::absolute(self.config.repackager_path())?;
        let uasset_dir = std::path::absolute(layout.uasset_dir())?;
        let utoc = std::path::absolute(layout.utoc_path())?;

        tools::run_tool(
            &repackager,
            [
                OsStr::new("to-zen"),
                OsStr::new("--version"),
                OsStr::new(&self.config.repackager_engine_version),
                uasset_dir.as_os_str(),
                utoc.as_os_str(),
            ],
            Some(self.config.utilities_dir.as_path()),
            self.config.tool_timeout(),
        )?;
        Ok(())
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
