//! Types for build progress tracking and results

use std::path::PathBuf;

use moriadef::patch::ApplyReport;

/// Progress callback type for builds
pub type BuildProgressCallback<'a> = &'a (dyn Fn(&BuildProgress) + Sync + Send);

/// Phase of a mod build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    /// Removing output from a previous build
    Cleaning,
    /// Copying baseline JSON and applying definitions
    ProcessingDefinitions,
    /// Running the JSON to uasset converter
    Converting,
    /// Running the repackager
    Packaging,
    /// Writing the ZIP archive
    Archiving,
    /// Build complete
    Complete,
}

impl BuildPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cleaning => "Cleaning",
            Self::ProcessingDefinitions => "Processing definitions",
            Self::Converting => "Converting",
            Self::Packaging => "Packaging",
            Self::Archiving => "Archiving",
            Self::Complete => "Complete",
        }
    }
}

/// Progress information during a build
#[derive(Debug, Clone)]
pub struct BuildProgress {
    pub phase: BuildPhase,
    /// Overall progress (0.0 - 1.0)
    pub fraction: f32,
    pub message: String,
}

impl BuildProgress {
    #[must_use]
    pub fn new(phase: BuildPhase, fraction: f32, message: impl Into<String>) -> Self {
        Self {
            phase,
            fraction: fraction.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Progress inside a phase spanning `start..end` of the whole build,
    /// after `done` of `total` items.
    #[must_use]
    pub fn within(
        phase: BuildPhase,
        start: f32,
        end: f32,
        done: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        let step = if total == 0 { 0.0 } else { done as f32 / total as f32 };
        Self::new(phase, start + (end - start) * step, message)
    }

    /// Progress as a whole percentage
    #[must_use]
    pub fn percent(&self) -> u64 {
        (self.fraction * 100.0).round() as u64
    }
}

/// A definition that was applied during a build
#[derive(Debug, Clone)]
pub struct ProcessedDefinition {
    /// The `.def` file
    pub definition: PathBuf,
    /// Normalized target path relative to the JSON data root
    pub target: String,
    pub report: ApplyReport,
}

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub mod_name: String,
    /// The finished ZIP archive
    pub archive: PathBuf,
    pub definitions: Vec<ProcessedDefinition>,
    /// Number of JSON files converted to uasset
    pub converted: usize,
    /// Number of files written to the archive
    pub archived: usize,
}
