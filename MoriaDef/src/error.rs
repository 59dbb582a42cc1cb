//! Error types for `MoriaDef`

use thiserror::Error;

/// The error type for `MoriaDef` operations.
///
/// Only structurally fatal problems surface here. Missing rows, unresolved
/// property paths and bad directive payloads are reported through
/// [`ApplyReport`](crate::patch::ApplyReport) instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    // ==================== Definition Errors ====================
    /// The `.def` file is well-formed XML but not a usable definition.
    #[error("invalid definition: {message}")]
    InvalidDefinition {
        /// Description of what is invalid.
        message: String,
    },

    // ==================== Document Errors ====================
    /// The baseline JSON parsed but does not have an exported-asset shape.
    #[error("invalid document: {message}")]
    InvalidDocument {
        /// Description of what is invalid.
        message: String,
    },
}

impl Error {
    pub(crate) fn definition(message: impl Into<String>) -> Self {
        Error::InvalidDefinition {
            message: message.into(),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

/// A specialized Result type for `MoriaDef` operations.
pub type Result<T> = std::result::Result<T, Error>;
