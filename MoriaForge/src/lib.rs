//! `MoriaForge` - Return to Moria modding toolkit
//!
//! Builds on [`moriadef`] to turn `.def` definitions into installable mods:
//!
//! - [`operations::apply_def_to_json`] patches a single baseline JSON file
//! - [`build::BuildManager`] runs the full pipeline (patch, convert,
//!   repackage, zip) using the paths in a [`config::ForgeConfig`]
//! - [`operations::extract_json`] converts unpacked game assets into the
//!   baseline JSON tree the builds start from
//!
//! # Example
//!
//! ```no_run
//! use moriaforge::build::BuildManager;
//! use moriaforge::config::ForgeConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> moriaforge::Result<()> {
//! let config = ForgeConfig::load_or_default(ForgeConfig::default_path()?)?;
//! let report = BuildManager::new(config).build("BrighterTorches", &[PathBuf::from("torches.def")])?;
//! println!("Wrote {}", report.archive.display());
//! # Ok(())
//! # }
//! ```

// Re-export moriadef
pub use moriadef;

pub mod build;
pub mod config;
pub mod error;
pub mod operations;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};

/// Commonly used types
pub mod prelude {
    pub use crate::build::{BuildManager, BuildPhase, BuildProgress, BuildReport};
    pub use crate::config::ForgeConfig;
    pub use crate::error::{Error, Result};
    pub use crate::operations::{ExtractReport, apply_def_to_json, extract_json};
}
