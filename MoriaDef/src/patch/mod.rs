//! Applying definitions to baseline documents

pub mod engine;
pub mod imports;
pub mod rows;
pub mod tags;

pub use engine::{Applied, ApplyOptions, ApplyReport, PatchEngine, SkipReason, SkippedDirective};
pub use imports::{combine_import_fragments, merge_imports};
pub use rows::{UpsertResult, upsert_row};
