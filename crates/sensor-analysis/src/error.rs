//! Error types for the analysis core

use thiserror::Error;

/// Errors that stop an analysis before any result is produced.
///
/// Degenerate statistics (zero standard deviation) and a failed dark frame
/// check are not errors; both are reported inside the result instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    #[error("Image contains no finite samples ({total} pixels, all NaN or infinite)")]
    NoFiniteSamples { total: usize },

    #[error("Invalid analysis configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse analysis configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigIo {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
