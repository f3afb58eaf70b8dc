//! Frame loading for PixelCheck
//!
//! Decodes dark frames from camera raw and standard image files into raw
//! sample grids, finds frames in a directory and runs the analyzer over
//! many frames in parallel.

pub mod batch;
pub mod decode;
pub mod error;
pub mod format;
pub mod scan;

pub use batch::{analyze_batch, analyze_frame, BatchOptions, BatchOutcome, FrameAnalysis};
pub use decode::{load_frame, FrameInfo, LoadedFrame};
pub use error::{FrameError, LoadError};
pub use format::{FrameFormat, SensorKind};
pub use scan::scan_directory;
