use thiserror::Error;

use super::config::ConfigError;
use crate::core::files::FileError;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    File(#[from] FileError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Required input '{path}' does not exist", path = path.display())]
    MissingInput { path: PathBuf },

    #[error("Failed to launch '{program}': {source}")]
    ToolLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}; see '{log}'", log = log.display())]
    ToolFailed {
        program: String,
        status: String,
        log: PathBuf,
    },

    #[error("Expected output '{path}' was not produced; see '{log}'", path = path.display(), log = log.display())]
    MissingArtifact { path: PathBuf, log: PathBuf },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl EngineError {
    /// Errors confined to a single ligand record; the stage moves on to the next one.
    pub fn is_record_failure(&self) -> bool {
        matches!(self, Self::ToolFailed { .. } | Self::MissingArtifact { .. })
    }
}
