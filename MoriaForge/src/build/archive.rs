//! Mod ZIP archive creation

use std::fs::{self, File};
use std::io;
use std::path::Path;

use moriadef::utils::normalize_path;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};

/// Zip every file under `source` into `dest`.
///
/// Entry names are relative to `base` (an ancestor of `source`) with forward
/// slashes, so zipping `finalmod/Mod_P` from `finalmod` keeps the `Mod_P/`
/// folder in the archive. Returns the number of files written.
pub fn create_archive(base: &Path, source: &Path, dest: &Path) -> Result<usize> {
    if !source.is_dir() {
        return Err(Error::SourceNotFound {
            path: source.to_path_buf(),
        });
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut zip = zip::ZipWriter::new(File::create(dest)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut count = 0;
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(base) else {
            continue;
        };

        let name = normalize_path(relative);
        tracing::debug!("Adding {} to archive", name);
        zip.start_file(name, options)?;
        io::copy(&mut File::open(entry.path())?, &mut zip)?;
        count += 1;
    }

    zip.finish()?;
    tracing::info!("Created mod zip: {} ({} files)", dest.display(), count);
    Ok(count)
}
