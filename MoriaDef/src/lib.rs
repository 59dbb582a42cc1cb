//! # MoriaDef
//!
//! Definition files and data-table patching for Return to Moria mods.
//!
//! A definition (`.def`) is a small XML change-set: add import entries, add
//! or replace data-table rows, change row properties, swap gameplay tags.
//! This crate parses definitions and applies them to the JSON form of the
//! game's cooked assets. It never touches the asset pipeline itself; the
//! caller loads the baseline JSON, patches it here and writes it back.
//!
//! ## Quick Start
//!
//! ### Applying a Definition
//!
//! ```no_run
//! use moriadef::definition::read_definition;
//! use moriadef::json::{read_document, write_document};
//! use moriadef::patch::{ApplyOptions, PatchEngine};
//!
//! let definition = read_definition("bigger_torches.def")?;
//! let mut doc = read_document("DT_Items.json")?;
//!
//! let engine = PatchEngine::new(ApplyOptions::default());
//! let report = engine.apply_definition(&mut doc, &definition, "DT_Items.json");
//! println!("{report}");
//!
//! write_document("DT_Items.json", &doc)?;
//! # Ok::<(), moriadef::Error>(())
//! ```
//!
//! ### Writing a Definition
//!
//! ```
//! use moriadef::definition::{Change, DefinitionBuilder};
//!
//! let definition = DefinitionBuilder::new()
//!     .title("Bigger Torches")
//!     .change("\\Moria\\Content\\DT_Items.json", Change::new("Torch", "BurnTime", "25"))
//!     .build();
//! let xml = definition.to_xml()?;
//! assert!(xml.contains(r#"<change item="Torch" property="BurnTime" value="25"/>"#));
//! # Ok::<(), moriadef::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use moriadef::prelude::*;
//!
//! // DefinitionDocument, PatchEngine, ApplyOptions, ApplyReport,
//! // RecordLocator, NameMatch, Error, Result and more
//! ```

pub mod definition;
pub mod error;
pub mod json;
pub mod patch;
pub mod utils;

pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::definition::{
        Change, DefinitionBuilder, DefinitionDocument, Delete, Directive, DirectiveKind, ModSection, NONE_ITEM,
        parse_definition, read_definition,
    };
    pub use crate::json::{
        NameMatch, PropertyPath, RecordLocator, TableShape, coerce, parse_document, read_document,
        to_pretty_string, write_document,
    };
    pub use crate::patch::{ApplyOptions, ApplyReport, PatchEngine, SkipReason, SkippedDirective, UpsertResult};
    pub use crate::utils::path::{normalize_mod_path, resolve_mod_path};
}
