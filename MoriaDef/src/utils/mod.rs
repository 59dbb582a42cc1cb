//! Utility functions

pub mod path;

pub use path::{mod_file_name, normalize_mod_path, normalize_path, resolve_mod_path};
