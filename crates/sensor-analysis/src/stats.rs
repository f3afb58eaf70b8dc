//! Robust summary statistics over a normalized frame
//!
//! Every statistic is computed over the finite samples of the flattened
//! frame. Quartiles use linear interpolation between closest ranks, and the
//! median of an even-length sample is the mean of the two middle values.

use crate::error::{AnalysisError, Result};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Number of equal-width bins used to locate the histogram mode
pub const MODE_HISTOGRAM_BINS: usize = 50;

/// Snapshot of the frame statistics, computed once per analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    /// Median absolute deviation from the median (unscaled)
    pub mad: f64,
    /// Centre of the most populated histogram bin
    pub mode: f64,
    /// Number of finite samples the statistics were computed from
    pub sample_count: usize,
}

impl BasicStats {
    pub fn compute(pixels: ArrayView2<'_, f32>) -> Result<Self> {
        let mut sorted = finite_samples(pixels);
        if sorted.is_empty() {
            return Err(AnalysisError::NoFiniteSamples {
                total: pixels.len(),
            });
        }
        sorted.sort_unstable_by(f64::total_cmp);

        let (mean, std) = mean_std_of(&sorted);
        let median = percentile_of_sorted(&sorted, 50.0);
        let q1 = percentile_of_sorted(&sorted, 25.0);
        let q3 = percentile_of_sorted(&sorted, 75.0);
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        let mode = histogram_mode(&sorted, min, max, MODE_HISTOGRAM_BINS);
        let sample_count = sorted.len();

        // Reuse the sample buffer for the absolute deviations
        let mut deviations = sorted;
        for v in deviations.iter_mut() {
            *v = (*v - median).abs();
        }
        deviations.sort_unstable_by(f64::total_cmp);
        let mad = percentile_of_sorted(&deviations, 50.0);

        Ok(Self {
            mean,
            std,
            median,
            min,
            max,
            q1,
            q3,
            iqr: q3 - q1,
            mad,
            mode,
            sample_count,
        })
    }
}

/// Mean and population standard deviation of the finite samples.
///
/// Returns `None` when the frame has no finite sample.
pub fn mean_std(pixels: ArrayView2<'_, f32>) -> Option<(f64, f64)> {
    let samples = finite_samples(pixels);
    if samples.is_empty() {
        return None;
    }
    Some(mean_std_of(&samples))
}

fn finite_samples(pixels: ArrayView2<'_, f32>) -> Vec<f64> {
    pixels
        .iter()
        .filter(|v| v.is_finite())
        .map(|&v| v as f64)
        .collect()
}

fn mean_std_of(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Percentile `p` (0-100) of an ascending, non-empty slice with linear interpolation
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Centre of the fullest of `bins` equal-width bins spanning `[min, max]`.
///
/// The last bin is closed on the right. A zero-width range is widened to
/// `[min - 0.5, max + 0.5]`. Ties go to the lowest bin.
fn histogram_mode(values: &[f64], min: f64, max: f64, bins: usize) -> f64 {
    let (low, high) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
    let width = (high - low) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let index = (((v - low) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    let mut best = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = i;
        }
    }

    low + (best as f64 + 0.5) * width
}
