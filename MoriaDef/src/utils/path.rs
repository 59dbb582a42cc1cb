//! Path utilities

use std::path::{Path, PathBuf};

/// Normalize path separators to forward slashes
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Normalize the `file` attribute of a `<mod>` section.
///
/// Leading slashes and backslashes are stripped and backslashes become
/// forward slashes, so `\Moria\Content\DT_Items.json` and
/// `Moria/Content/DT_Items.json` name the same relative file.
pub fn normalize_mod_path(raw: &str) -> String {
    raw.trim_start_matches(['\\', '/']).replace('\\', "/")
}

/// Join a `<mod file=...>` target onto a base directory.
pub fn resolve_mod_path<P: AsRef<Path>>(base: P, raw: &str) -> PathBuf {
    let mut path = base.as_ref().to_path_buf();
    for segment in normalize_mod_path(raw).split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}

/// Final component of a `<mod file=...>` target (e.g. `DT_Items.json`).
pub fn mod_file_name(raw: &str) -> &str {
    raw.rsplit(['\\', '/']).next().unwrap_or(raw)
}
