use std::path::PathBuf;

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    #[error("MoriaDef error: {0}")]
    MoriaDef(#[from] moriadef::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{tool} not found at {}", path.display())]
    ToolNotFound { tool: String, path: PathBuf },

    #[error("{tool} failed with exit code {code:?}: {stderr}")]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{tool} timed out after {seconds}s")]
    ToolTimedOut { tool: String, seconds: u64 },

    #[error("Source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("No definition files selected")]
    NoDefinitions,

    #[error("{succeeded} succeeded, {failed} failed")]
    DefinitionsFailed { succeeded: usize, failed: usize },

    #[error("Could not determine the user config directory")]
    ConfigDirUnavailable,

    #[error("Build error: {0}")]
    Build(String),
}

pub type Result<T> = std::result::Result<T, Error>;
