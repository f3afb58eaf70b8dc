//! Dark frame analysis library for PixelCheck
//!
//! Detects hot and dead pixels in a dark frame by consensus of three
//! outlier estimators and grades the sensor from the defect rates and SNR.
//! Everything here is pure computation over an in-memory frame; decoding
//! and report output live in sibling crates.

pub mod analysis;
pub mod config;
pub mod dark_frame;
pub mod detector;
pub mod error;
pub mod normalize;
pub mod quality;
pub mod stats;

pub use analysis::{AnalysisResult, SensorAnalyzer};
pub use config::AnalysisConfig;
pub use dark_frame::{snr_db, DarkFrameCheck, DarkFrameValidator, SNR_UNDEFINED_DB};
pub use detector::{DefectDetector, DefectMasks, DefectThresholds, Detection, ThresholdPair};
pub use error::{AnalysisError, Result};
pub use normalize::{normalize, BitDepth, NormalizedFrame};
pub use quality::{Classification, QualityClassifier, QualityGrade};
pub use stats::BasicStats;
