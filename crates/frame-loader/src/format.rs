//! File format and sensor layout tags
//!
//! Formats are recognised by file extension only. Camera raw formats go
//! through `rawloader`; everything else through the `image` crate.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum FrameFormat {
    Tiff,
    Png,
    Jpeg,
    Bmp,
    Dng,
    Cr2,
    Nef,
    Arw,
    Raf,
    Orf,
    Rw2,
    /// Unrecognised extension, lowercased
    Other(String),
}

impl FrameFormat {
    /// Extensions accepted when scanning a directory
    pub const SUPPORTED_EXTENSIONS: [&'static str; 13] = [
        "tif", "tiff", "png", "jpg", "jpeg", "bmp", "dng", "cr2", "nef", "arw", "raf", "orf", "rw2",
    ];

    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "tif" | "tiff" => FrameFormat::Tiff,
            "png" => FrameFormat::Png,
            "jpg" | "jpeg" => FrameFormat::Jpeg,
            "bmp" => FrameFormat::Bmp,
            "dng" => FrameFormat::Dng,
            "cr2" => FrameFormat::Cr2,
            "nef" => FrameFormat::Nef,
            "arw" => FrameFormat::Arw,
            "raf" => FrameFormat::Raf,
            "orf" => FrameFormat::Orf,
            "rw2" => FrameFormat::Rw2,
            other => FrameFormat::Other(other.to_string()),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        Self::from_extension(extension)
    }

    /// Camera raw container decoded by `rawloader`
    pub fn is_raw(&self) -> bool {
        matches!(
            self,
            FrameFormat::Dng
                | FrameFormat::Cr2
                | FrameFormat::Nef
                | FrameFormat::Arw
                | FrameFormat::Raf
                | FrameFormat::Orf
                | FrameFormat::Rw2
        )
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FrameFormat::Other(_))
    }
}

impl std::fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameFormat::Tiff => write!(f, "TIFF"),
            FrameFormat::Png => write!(f, "PNG"),
            FrameFormat::Jpeg => write!(f, "JPEG"),
            FrameFormat::Bmp => write!(f, "BMP"),
            FrameFormat::Dng => write!(f, "DNG"),
            FrameFormat::Cr2 => write!(f, "CR2"),
            FrameFormat::Nef => write!(f, "NEF"),
            FrameFormat::Arw => write!(f, "ARW"),
            FrameFormat::Raf => write!(f, "RAF"),
            FrameFormat::Orf => write!(f, "ORF"),
            FrameFormat::Rw2 => write!(f, "RW2"),
            FrameFormat::Other(ext) => write!(f, "{}", ext.to_ascii_uppercase()),
        }
    }
}

impl From<String> for FrameFormat {
    fn from(name: String) -> Self {
        FrameFormat::from_extension(&name)
    }
}

impl From<FrameFormat> for String {
    fn from(format: FrameFormat) -> Self {
        format.to_string()
    }
}

/// Colour filter layout of the sensor that produced the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    Monochrome,
    /// 2x2 colour filter array
    Bayer,
    /// Fujifilm 6x6 colour filter array
    XTrans,
    /// Demosaiced or otherwise unknown layout
    Unknown,
}

impl SensorKind {
    /// Classify from the CFA period reported by the raw decoder
    pub fn from_cfa(width: usize, height: usize, components: usize) -> Self {
        match (width, height) {
            (2, 2) => SensorKind::Bayer,
            (6, 6) => SensorKind::XTrans,
            (0, 0) if components == 1 => SensorKind::Monochrome,
            _ => SensorKind::Unknown,
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorKind::Monochrome => write!(f, "monochrome"),
            SensorKind::Bayer => write!(f, "bayer"),
            SensorKind::XTrans => write!(f, "x-trans"),
            SensorKind::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for SensorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monochrome" | "mono" => Ok(SensorKind::Monochrome),
            "bayer" => Ok(SensorKind::Bayer),
            "x-trans" | "xtrans" => Ok(SensorKind::XTrans),
            "unknown" => Ok(SensorKind::Unknown),
            _ => Err(format!(
                "Invalid sensor kind: {}. Valid options: monochrome, bayer, x-trans, unknown",
                s
            )),
        }
    }
}
