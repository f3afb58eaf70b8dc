use sensor_analysis::AnalysisError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while locating or decoding a frame. Every variant names the file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    #[error("Unsupported file format '{extension}' for '{path}'")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Failed to decode '{path}': {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Not a directory: '{path}'")]
    NotADirectory { path: PathBuf },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path }
            | LoadError::UnsupportedFormat { path, .. }
            | LoadError::Decode { path, .. }
            | LoadError::Io { path, .. }
            | LoadError::NotADirectory { path } => path,
        }
    }
}

/// Why one frame of a batch produced no result
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Analysis of '{path}' failed: {source}")]
    Analysis {
        path: PathBuf,
        source: AnalysisError,
    },

    #[error("Skipped '{path}': batch cancelled after an earlier failure")]
    Cancelled { path: PathBuf },
}

impl FrameError {
    pub fn path(&self) -> &Path {
        match self {
            FrameError::Load(err) => err.path(),
            FrameError::Analysis { path, .. } | FrameError::Cancelled { path } => path,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FrameError::Cancelled { .. })
    }
}
