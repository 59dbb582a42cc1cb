//! Definition (`.def`) files
//!
//! A definition is an XML change-set describing edits to one or more
//! baseline JSON documents. See [`reader`] for the format.

pub mod builder;
pub mod reader;
pub mod types;
mod writer;

pub use builder::DefinitionBuilder;
pub use reader::{parse_definition, read_definition};
pub use types::{Change, DefinitionDocument, Delete, Directive, DirectiveKind, ModSection, NONE_ITEM};
