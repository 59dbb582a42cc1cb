//! Per-mod working directory layout
//!
//! ```text
//! <mymodfiles>/<mod>/
//!   jsonfiles/   patched JSON, mirroring the baseline tree
//!   uasset/      converter output
//!   finalmod/
//!     <mod>_P/   repackager output (<mod>_P.utoc and friends)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const JSONFILES_DIR: &str = "jsonfiles";
pub const UASSET_DIR: &str = "uasset";
pub const FINALMOD_DIR: &str = "finalmod";

/// Working directories for one mod build
#[derive(Debug, Clone)]
pub struct ModLayout {
    root: PathBuf,
    mod_name: String,
}

impl ModLayout {
    pub fn new(mymodfiles_dir: impl AsRef<Path>, mod_name: &str) -> Self {
        Self {
            root: mymodfiles_dir.as_ref().join(mod_name),
            mod_name: mod_name.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn jsonfiles_dir(&self) -> PathBuf {
        self.root.join(JSONFILES_DIR)
    }

    pub fn uasset_dir(&self) -> PathBuf {
        self.root.join(UASSET_DIR)
    }

    pub fn finalmod_dir(&self) -> PathBuf {
        self.root.join(FINALMOD_DIR)
    }

    /// `<mod>_P`, the folder name the game loads
    pub fn packaged_name(&self) -> String {
        format!("{}_P", self.mod_name)
    }

    pub fn packaged_dir(&self) -> PathBuf {
        self.finalmod_dir().join(self.packaged_name())
    }

    /// Table-of-contents file the repackager writes
    pub fn utoc_path(&self) -> PathBuf {
        self.packaged_dir().join(format!("{}.utoc", self.packaged_name()))
    }

    /// Remove output left over from a previous build.
    ///
    /// Directories that cannot be removed are logged and left in place.
    pub fn clean(&self) -> Result<()> {
        for dir in [self.jsonfiles_dir(), self.uasset_dir(), self.finalmod_dir()] {
            if !dir.exists() {
                continue;
            }
            match fs::remove_dir_all(&dir) {
                Ok(()) => tracing::info!("Cleaned directory: {}", dir.display()),
                Err(e) => tracing::warn!("Could not clean directory {}: {}", dir.display(), e),
            }
        }
        Ok(())
    }
}
