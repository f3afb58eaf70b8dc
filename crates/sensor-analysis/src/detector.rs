//! Hot and dead pixel detection by estimator consensus
//!
//! Three independent outlier estimators each propose a hot and a dead
//! threshold:
//!
//! - **Sigma**: `mean ± k·std`. Simple, but a handful of very bright pixels
//!   inflate `std` and hide milder defects.
//! - **IQR**: `Q3 + m·IQR` / `Q1 - m·IQR`. Insensitive to the tails, but
//!   skewed dark current distributions shift the quartiles.
//! - **MAD**: `median ± m·MAD`. Most robust, but collapses to the median on
//!   heavily quantized frames where MAD is zero.
//!
//! A pixel is flagged only when at least two of the three estimators agree.

use crate::config::AnalysisConfig;
use crate::stats::BasicStats;
use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

/// Estimators that must agree before a pixel is flagged
pub const CONSENSUS_VOTES: usize = 2;

/// Upper (hot) and lower (dead) bound proposed by one estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub hot: f64,
    pub dead: f64,
}

impl ThresholdPair {
    fn around(centre_hot: f64, centre_dead: f64, spread: f64, hot_mult: f64, dead_mult: f64) -> Self {
        Self {
            hot: centre_hot + hot_mult * spread,
            dead: centre_dead - dead_mult * spread,
        }
    }
}

/// Thresholds of all three estimators, as applied to the normalized frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefectThresholds {
    pub sigma: ThresholdPair,
    pub iqr: ThresholdPair,
    pub mad: ThresholdPair,
}

impl DefectThresholds {
    pub fn from_stats(stats: &BasicStats, config: &AnalysisConfig) -> Self {
        Self {
            sigma: ThresholdPair::around(
                stats.mean,
                stats.mean,
                stats.std,
                config.hot_pixel_sigma,
                config.dead_pixel_sigma,
            ),
            iqr: ThresholdPair::around(
                stats.q3,
                stats.q1,
                stats.iqr,
                config.hot_pixel_iqr_mult,
                config.dead_pixel_iqr_mult,
            ),
            mad: ThresholdPair::around(
                stats.median,
                stats.median,
                stats.mad,
                config.hot_pixel_mad_mult,
                config.dead_pixel_mad_mult,
            ),
        }
    }

    fn pairs(&self) -> [ThresholdPair; 3] {
        [self.sigma, self.iqr, self.mad]
    }

    /// Number of estimators whose hot threshold `value` strictly exceeds
    pub fn hot_votes(&self, value: f64) -> usize {
        self.pairs().iter().filter(|pair| value > pair.hot).count()
    }

    /// Number of estimators whose dead threshold `value` is strictly below
    pub fn dead_votes(&self, value: f64) -> usize {
        self.pairs().iter().filter(|pair| value < pair.dead).count()
    }

    pub fn is_hot(&self, value: f32) -> bool {
        value.is_finite() && self.hot_votes(value as f64) >= CONSENSUS_VOTES
    }

    pub fn is_dead(&self, value: f32) -> bool {
        value.is_finite() && self.dead_votes(value as f64) >= CONSENSUS_VOTES
    }
}

/// Per-pixel verdicts, congruent with the analysed frame
#[derive(Debug, Clone, PartialEq)]
pub struct DefectMasks {
    pub hot: Array2<bool>,
    pub dead: Array2<bool>,
}

impl DefectMasks {
    pub fn hot_count(&self) -> usize {
        self.hot.iter().filter(|&&flag| flag).count()
    }

    pub fn dead_count(&self) -> usize {
        self.dead.iter().filter(|&&flag| flag).count()
    }

    /// Hot pixel coordinates as `(x, y)`, in row-major order
    pub fn hot_coordinates(&self) -> Vec<(usize, usize)> {
        flagged_coordinates(&self.hot)
    }

    /// Dead pixel coordinates as `(x, y)`, in row-major order
    pub fn dead_coordinates(&self) -> Vec<(usize, usize)> {
        flagged_coordinates(&self.dead)
    }
}

fn flagged_coordinates(mask: &Array2<bool>) -> Vec<(usize, usize)> {
    mask.indexed_iter()
        .filter(|(_, flag)| **flag)
        .map(|((y, x), _)| (x, y))
        .collect()
}

/// Outcome of a detection pass
#[derive(Debug, Clone)]
pub struct Detection {
    pub masks: DefectMasks,
    pub thresholds: DefectThresholds,
    pub hot_pixels: usize,
    pub dead_pixels: usize,
    pub total_pixels: usize,
    /// Share of all pixels flagged hot, in percent
    pub hot_percentage: f64,
    /// Share of all pixels flagged dead, in percent
    pub dead_percentage: f64,
}

pub struct DefectDetector;

impl DefectDetector {
    /// Derive thresholds from `stats` and flag every pixel of `pixels`
    pub fn detect(pixels: ArrayView2<'_, f32>, stats: &BasicStats, config: &AnalysisConfig) -> Detection {
        let thresholds = DefectThresholds::from_stats(stats, config);
        Self::detect_with_thresholds(pixels, thresholds)
    }

    /// Flag pixels against explicit thresholds
    pub fn detect_with_thresholds(pixels: ArrayView2<'_, f32>, thresholds: DefectThresholds) -> Detection {
        let mut hot = Array2::from_elem(pixels.raw_dim(), false);
        let mut dead = Array2::from_elem(pixels.raw_dim(), false);

        Zip::from(&mut hot)
            .and(&mut dead)
            .and(&pixels)
            .for_each(|hot, dead, &value| {
                *hot = thresholds.is_hot(value);
                *dead = thresholds.is_dead(value);
            });

        let masks = DefectMasks { hot, dead };
        let hot_pixels = masks.hot_count();
        let dead_pixels = masks.dead_count();
        let total_pixels = pixels.len();

        Detection {
            masks,
            thresholds,
            hot_pixels,
            dead_pixels,
            total_pixels,
            hot_percentage: percentage(hot_pixels, total_pixels),
            dead_percentage: percentage(dead_pixels, total_pixels),
        }
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn thresholds(sigma_hot: f64, iqr_hot: f64, mad_hot: f64) -> DefectThresholds {
        DefectThresholds {
            sigma: ThresholdPair { hot: sigma_hot, dead: 0.05 },
            iqr: ThresholdPair { hot: iqr_hot, dead: 0.05 },
            mad: ThresholdPair { hot: mad_hot, dead: 0.05 },
        }
    }

    #[test]
    fn test_single_estimator_is_not_enough() {
        // Only the sigma threshold is exceeded by 0.6
        let pixels = array![[0.1f32, 0.6], [0.1, 0.1]];
        let detection = DefectDetector::detect_with_thresholds(pixels.view(), thresholds(0.5, 0.9, 0.9));

        assert_eq!(detection.thresholds.hot_votes(0.6), 1);
        assert_eq!(detection.hot_pixels, 0);
        assert!(!detection.masks.hot[[0, 1]]);
    }

    #[test]
    fn test_two_estimators_flag_pixel() {
        // Sigma and IQR agree on 0.6, MAD does not
        let pixels = array![[0.1f32, 0.6], [0.1, 0.1]];
        let detection = DefectDetector::detect_with_thresholds(pixels.view(), thresholds(0.5, 0.55, 0.9));

        assert_eq!(detection.thresholds.hot_votes(0.6), 2);
        assert_eq!(detection.hot_pixels, 1);
        assert!(detection.masks.hot[[0, 1]]);
        assert_eq!(detection.masks.hot_coordinates(), vec![(1, 0)]);
    }

    #[test]
    fn test_dead_votes_are_symmetric() {
        let t = DefectThresholds {
            sigma: ThresholdPair { hot: 1.0, dead: 0.2 },
            iqr: ThresholdPair { hot: 1.0, dead: 0.1 },
            mad: ThresholdPair { hot: 1.0, dead: 0.3 },
        };
        // Below sigma and mad only
        assert_eq!(t.dead_votes(0.15), 2);
        assert!(t.is_dead(0.15));
        // Below mad only
        assert_eq!(t.dead_votes(0.25), 1);
        assert!(!t.is_dead(0.25));
        // Exactly on a threshold does not vote
        assert_eq!(t.dead_votes(0.2), 1);
    }

    #[test]
    fn test_non_finite_pixels_never_flagged() {
        let t = thresholds(0.5, 0.5, 0.5);
        assert!(!t.is_hot(f32::INFINITY));
        assert!(!t.is_hot(f32::NAN));
        assert!(!t.is_dead(f32::NEG_INFINITY));
    }

    #[test]
    fn test_thresholds_from_stats() {
        let stats = BasicStats {
            mean: 0.1,
            std: 0.01,
            median: 0.1,
            min: 0.0,
            max: 1.0,
            q1: 0.09,
            q3: 0.11,
            iqr: 0.02,
            mad: 0.005,
            mode: 0.1,
            sample_count: 100,
        };
        let t = DefectThresholds::from_stats(&stats, &AnalysisConfig::default());

        assert!((t.sigma.hot - 0.16).abs() < 1e-12);
        assert!((t.sigma.dead - 0.04).abs() < 1e-12);
        assert!((t.iqr.hot - 0.18).abs() < 1e-12);
        assert!((t.iqr.dead - 0.02).abs() < 1e-12);
        assert!((t.mad.hot - 0.12).abs() < 1e-12);
        assert!((t.mad.dead - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let mut pixels = Array2::from_elem((20, 20), 0.01f32);
        pixels[[5, 5]] = 0.9;
        pixels[[7, 2]] = 0.0;
        let stats = BasicStats::compute(pixels.view()).unwrap();
        let config = AnalysisConfig::default();

        let first = DefectDetector::detect(pixels.view(), &stats, &config);
        let second = DefectDetector::detect(pixels.view(), &stats, &config);

        assert_eq!(first.masks, second.masks);
        assert_eq!(first.hot_pixels, second.hot_pixels);
        assert_eq!(first.dead_pixels, second.dead_pixels);
        assert_eq!(first.hot_pixels, 1);
        assert_eq!(first.dead_pixels, 1);
        assert_eq!(first.masks.dead_coordinates(), vec![(2, 7)]);
        assert!((first.hot_percentage - 0.25).abs() < 1e-12);
    }
}
