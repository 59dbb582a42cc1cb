//! Standalone operations on definition, JSON and asset files

pub mod apply;
pub mod extract;

pub use apply::apply_def_to_json;
pub use extract::{ExtractProgress, ExtractReport, extract_json, extract_json_with_progress};
