//! Frame decoding into a single-channel sample grid
//!
//! Camera raw files are decoded with `rawloader` and analysed as the raw
//! mosaic, without demosaicing. If `rawloader` cannot read the file, the
//! `image` crate gets a second try. Standard images are reduced to
//! luminance while keeping their native sample range, so an 8-bit export
//! stays within 0..=255 and a 16-bit export within 0..=65535.

use crate::error::LoadError;
use crate::format::{FrameFormat, SensorKind};
use image::DynamicImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where a frame came from and how it was stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub width: usize,
    pub height: usize,
    pub format: FrameFormat,
    pub sensor: SensorKind,
    /// Bits per sample of the container, not of the ADC
    pub container_bits: u32,
}

impl FrameInfo {
    /// File name without its extension, used to name report files
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_name.clone())
    }
}

#[derive(Debug, Clone)]
pub struct LoadedFrame {
    pub info: FrameInfo,
    pub pixels: Array2<f32>,
}

/// Decoded samples before they are tagged with file information
struct DecodedSamples {
    pixels: Array2<f32>,
    sensor: SensorKind,
    container_bits: u32,
}

/// Load a frame from disk as raw sample values
pub fn load_frame(path: &Path) -> Result<LoadedFrame, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let format = FrameFormat::from_path(path);
    if !format.is_supported() {
        let extension = match &format {
            FrameFormat::Other(ext) => ext.clone(),
            _ => String::new(),
        };
        return Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        });
    }

    let decoded = if format.is_raw() {
        match decode_raw(path) {
            Ok(decoded) => decoded,
            Err(raw_reason) => {
                log::warn!(
                    "rawloader could not read {}: {}. Trying generic decoder",
                    path.display(),
                    raw_reason
                );
                decode_standard(path).map_err(|err| {
                    log::debug!("Generic decoder also failed on {}: {}", path.display(), err);
                    LoadError::Decode {
                        path: path.to_path_buf(),
                        reason: raw_reason,
                    }
                })?
            }
        }
    } else {
        decode_standard(path)?
    };

    let (height, width) = decoded.pixels.dim();
    log::debug!(
        "Loaded {} ({}x{}, {}, {}-bit container, {} sensor)",
        path.display(),
        width,
        height,
        format,
        decoded.container_bits,
        decoded.sensor
    );

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(LoadedFrame {
        info: FrameInfo {
            path: path.to_path_buf(),
            file_name,
            width,
            height,
            format,
            sensor: decoded.sensor,
            container_bits: decoded.container_bits,
        },
        pixels: decoded.pixels,
    })
}

fn decode_raw(path: &Path) -> Result<DecodedSamples, String> {
    let raw = rawloader::decode_file(path).map_err(|e| e.to_string())?;
    let components = raw.cpp.max(1);

    let (samples, container_bits) = match &raw.data {
        rawloader::RawImageData::Integer(data) => (average_components(data, components), 16),
        rawloader::RawImageData::Float(data) => (average_components(data, components), 32),
    };

    let pixels = Array2::from_shape_vec((raw.height, raw.width), samples).map_err(|e| {
        format!(
            "{}x{} raw image with {} components per pixel has inconsistent data: {}",
            raw.width, raw.height, components, e
        )
    })?;

    Ok(DecodedSamples {
        pixels,
        sensor: SensorKind::from_cfa(raw.cfa.width, raw.cfa.height, components),
        container_bits,
    })
}

fn average_components<T: Copy + Into<f32>>(data: &[T], components: usize) -> Vec<f32> {
    if components == 1 {
        return data.iter().map(|&v| v.into()).collect();
    }
    data.chunks_exact(components)
        .map(|px| px.iter().map(|&v| v.into()).sum::<f32>() / components as f32)
        .collect()
}

fn decode_standard(path: &Path) -> Result<DecodedSamples, LoadError> {
    let image = image::open(path).map_err(|err| match err {
        image::ImageError::IoError(source) => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => LoadError::Decode {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })?;

    let width = image.width() as usize;
    let height = image.height() as usize;

    let (samples, container_bits) = match &image {
        DynamicImage::ImageLuma8(buf) => (luminance(buf.as_raw(), 1, u8::MAX as f32), 8),
        DynamicImage::ImageLumaA8(buf) => (luminance(buf.as_raw(), 2, u8::MAX as f32), 8),
        DynamicImage::ImageRgb8(buf) => (luminance(buf.as_raw(), 3, u8::MAX as f32), 8),
        DynamicImage::ImageRgba8(buf) => (luminance(buf.as_raw(), 4, u8::MAX as f32), 8),
        DynamicImage::ImageLuma16(buf) => (luminance(buf.as_raw(), 1, u16::MAX as f32), 16),
        DynamicImage::ImageLumaA16(buf) => (luminance(buf.as_raw(), 2, u16::MAX as f32), 16),
        DynamicImage::ImageRgb16(buf) => (luminance(buf.as_raw(), 3, u16::MAX as f32), 16),
        DynamicImage::ImageRgba16(buf) => (luminance(buf.as_raw(), 4, u16::MAX as f32), 16),
        DynamicImage::ImageRgb32F(buf) => (luminance(buf.as_raw(), 3, f32::INFINITY), 32),
        DynamicImage::ImageRgba32F(buf) => (luminance(buf.as_raw(), 4, f32::INFINITY), 32),
        other => {
            let rgb = other.to_rgb16();
            (luminance(rgb.as_raw(), 3, u16::MAX as f32), 16)
        }
    };

    let pixels = Array2::from_shape_vec((height, width), samples).map_err(|e| LoadError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(DecodedSamples {
        pixels,
        sensor: SensorKind::Unknown,
        container_bits,
    })
}

/// Per-pixel luminance of interleaved samples.
///
/// One or two channels are gray (+ alpha); three or four are RGB (+ alpha),
/// weighted 0.299 / 0.587 / 0.114. Results never exceed `ceiling`.
fn luminance<T: Copy + Into<f32>>(samples: &[T], channels: usize, ceiling: f32) -> Vec<f32> {
    samples
        .chunks_exact(channels)
        .map(|px| {
            if channels < 3 {
                px[0].into()
            } else {
                let (r, g, b): (f32, f32, f32) = (px[0].into(), px[1].into(), px[2].into());
                (0.299 * r + 0.587 * g + 0.114 * b).min(ceiling)
            }
        })
        .collect()
}
