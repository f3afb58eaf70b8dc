//! Bit depth inference and intensity normalization
//!
//! Camera exports rarely say which ADC depth produced the samples, so the
//! depth is inferred from the brightest finite sample: the smallest standard
//! depth whose full scale contains it. Samples are then scaled by that full
//! scale into `[0, 1]`.

use crate::error::{AnalysisError, Result};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Standard sensor ADC depths, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum BitDepth {
    Eight,
    Twelve,
    Fourteen,
    Sixteen,
}

impl BitDepth {
    pub const ALL: [BitDepth; 4] = [
        BitDepth::Eight,
        BitDepth::Twelve,
        BitDepth::Fourteen,
        BitDepth::Sixteen,
    ];

    pub fn bits(self) -> u32 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Twelve => 12,
            BitDepth::Fourteen => 14,
            BitDepth::Sixteen => 16,
        }
    }

    /// Full scale value, `2^bits - 1`
    pub fn max_value(self) -> f64 {
        ((1u32 << self.bits()) - 1) as f64
    }

    /// Smallest depth whose full scale holds `max_sample`.
    ///
    /// There is no tier above 16 bits: larger maxima still map to 16.
    pub fn infer(max_sample: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|depth| max_sample <= depth.max_value())
            .unwrap_or(BitDepth::Sixteen)
    }
}

impl From<BitDepth> for u32 {
    fn from(depth: BitDepth) -> Self {
        depth.bits()
    }
}

impl TryFrom<u32> for BitDepth {
    type Error = String;

    fn try_from(bits: u32) -> std::result::Result<Self, Self::Error> {
        match bits {
            8 => Ok(BitDepth::Eight),
            12 => Ok(BitDepth::Twelve),
            14 => Ok(BitDepth::Fourteen),
            16 => Ok(BitDepth::Sixteen),
            other => Err(format!("Unsupported bit depth: {other}. Valid options: 8, 12, 14, 16")),
        }
    }
}

impl std::fmt::Display for BitDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// A frame rescaled to `[0, 1]` together with the depth used to scale it
#[derive(Debug, Clone)]
pub struct NormalizedFrame {
    pub pixels: Array2<f32>,
    pub bit_depth: BitDepth,
}

impl NormalizedFrame {
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }
}

/// Infer the bit depth of `raw` and divide every sample by its full scale.
///
/// Non-finite samples are ignored when looking for the maximum and pass
/// through the division unchanged.
pub fn normalize(raw: ArrayView2<'_, f32>) -> Result<NormalizedFrame> {
    let (height, width) = raw.dim();
    if height == 0 || width == 0 {
        return Err(AnalysisError::EmptyImage { width, height });
    }

    let max_sample = raw
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<f32>, v| Some(acc.map_or(v, |m| m.max(v))))
        .ok_or(AnalysisError::NoFiniteSamples { total: raw.len() })?;

    let bit_depth = BitDepth::infer(max_sample as f64);
    let full_scale = bit_depth.max_value() as f32;

    Ok(NormalizedFrame {
        pixels: raw.mapv(|v| v / full_scale),
        bit_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_bit_depth_tiers() {
        assert_eq!(BitDepth::infer(0.0), BitDepth::Eight);
        assert_eq!(BitDepth::infer(255.0), BitDepth::Eight);
        assert_eq!(BitDepth::infer(256.0), BitDepth::Twelve);
        assert_eq!(BitDepth::infer(4095.0), BitDepth::Twelve);
        assert_eq!(BitDepth::infer(4096.0), BitDepth::Fourteen);
        assert_eq!(BitDepth::infer(16383.0), BitDepth::Fourteen);
        assert_eq!(BitDepth::infer(16384.0), BitDepth::Sixteen);
        assert_eq!(BitDepth::infer(65535.0), BitDepth::Sixteen);
        // No tier above 16 bits
        assert_eq!(BitDepth::infer(1_000_000.0), BitDepth::Sixteen);
    }

    #[test]
    fn test_bit_depth_conversions() {
        assert_eq!(BitDepth::Fourteen.max_value(), 16383.0);
        assert_eq!(u32::from(BitDepth::Twelve), 12);
        assert_eq!(BitDepth::try_from(16).unwrap(), BitDepth::Sixteen);
        assert!(BitDepth::try_from(10).is_err());
        assert_eq!(BitDepth::Eight.to_string(), "8-bit");
    }

    #[test]
    fn test_normalize_sixteen_bit() {
        let raw = array![[0.0f32, 1000.0], [65535.0, 32767.5]];
        let frame = normalize(raw.view()).unwrap();

        assert_eq!(frame.bit_depth, BitDepth::Sixteen);
        assert_eq!(frame.pixels[[0, 0]], 0.0);
        assert_eq!(frame.pixels[[1, 0]], 1.0);
        assert!((frame.pixels[[0, 1]] - 1000.0 / 65535.0).abs() < 1e-7);
        assert_eq!((frame.width(), frame.height()), (2, 2));
    }

    #[test]
    fn test_all_zero_image_is_eight_bit() {
        let raw = Array2::<f32>::zeros((8, 8));
        let frame = normalize(raw.view()).unwrap();

        assert_eq!(frame.bit_depth, BitDepth::Eight);
        assert!(frame.pixels.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_empty_image_rejected() {
        let raw = Array2::<f32>::zeros((0, 10));
        assert!(matches!(
            normalize(raw.view()),
            Err(AnalysisError::EmptyImage { width: 10, height: 0 })
        ));
    }

    #[test]
    fn test_only_non_finite_rejected() {
        let raw = array![[f32::NAN, f32::INFINITY], [f32::NEG_INFINITY, f32::NAN]];
        assert!(matches!(
            normalize(raw.view()),
            Err(AnalysisError::NoFiniteSamples { total: 4 })
        ));
    }

    #[test]
    fn test_non_finite_samples_ignored_for_depth() {
        let raw = array![[100.0f32, f32::INFINITY], [200.0, f32::NAN]];
        let frame = normalize(raw.view()).unwrap();

        assert_eq!(frame.bit_depth, BitDepth::Eight);
        assert!(frame.pixels[[1, 1]].is_nan());
    }
}
