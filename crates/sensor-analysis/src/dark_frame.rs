//! Dark frame validity check
//!
//! A genuine dark frame (lens cap on, short exposure, low ISO) has a low
//! mean, a small spread and a reasonable signal-to-noise ratio. Frames that
//! fail the check are still analysed; the verdict is advisory.

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::stats::mean_std;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// SNR reported when `mean / std` is undefined (zero spread or zero mean)
pub const SNR_UNDEFINED_DB: f64 = -100.0;

/// `20 * log10(mean / std)`, or [`SNR_UNDEFINED_DB`] unless both are positive
pub fn snr_db(mean: f64, std: f64) -> f64 {
    if std > 0.0 && mean > 0.0 {
        20.0 * (mean / std).log10()
    } else {
        SNR_UNDEFINED_DB
    }
}

/// Measured quantities and the resulting verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DarkFrameCheck {
    pub mean: f64,
    pub std: f64,
    pub snr_db: f64,
    pub is_valid: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct DarkFrameValidator {
    max_mean: f64,
    min_snr_db: f64,
    max_std: f64,
}

impl Default for DarkFrameValidator {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl DarkFrameValidator {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            max_mean: config.max_dark_mean,
            min_snr_db: config.min_snr_db,
            max_std: config.max_dark_std,
        }
    }

    /// Measure a normalized frame and judge it
    pub fn check(&self, pixels: ArrayView2<'_, f32>) -> Result<DarkFrameCheck> {
        let (mean, std) = mean_std(pixels).ok_or(AnalysisError::NoFiniteSamples {
            total: pixels.len(),
        })?;
        Ok(self.evaluate(mean, std))
    }

    /// Judge already measured statistics.
    ///
    /// All three bounds are strict and must hold together; the SNR sentinel
    /// therefore always fails a flat frame.
    pub fn evaluate(&self, mean: f64, std: f64) -> DarkFrameCheck {
        let snr_db = snr_db(mean, std);
        let is_valid = mean < self.max_mean && snr_db > self.min_snr_db && std < self.max_std;

        DarkFrameCheck {
            mean,
            std,
            snr_db,
            is_valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_snr_formula() {
        assert!((snr_db(0.1, 0.01) - 20.0).abs() < 1e-9);
        assert!((snr_db(1.0, 1.0)).abs() < 1e-12);
        assert_eq!(snr_db(0.0, 0.0), SNR_UNDEFINED_DB);
        assert_eq!(snr_db(0.5, 0.0), SNR_UNDEFINED_DB);
        assert_eq!(snr_db(0.0, 0.1), SNR_UNDEFINED_DB);
    }

    #[test]
    fn test_low_noise_dark_frame_is_valid() {
        let check = DarkFrameValidator::default().evaluate(0.02, 0.002);
        assert!((check.snr_db - 20.0).abs() < 1e-9);
        assert!(check.is_valid);
    }

    #[test]
    fn test_bright_frame_is_invalid() {
        // Mean far above 0.1 fails whatever the spread looks like
        let validator = DarkFrameValidator::default();
        assert!(!validator.evaluate(0.5, 0.001).is_valid);
        assert!(!validator.evaluate(0.5, 0.04).is_valid);

        let mut pixels = Array2::from_elem((16, 16), 0.5f32);
        pixels[[3, 3]] = 0.52;
        let check = validator.check(pixels.view()).unwrap();
        assert!(check.mean > 0.49);
        assert!(!check.is_valid);
    }

    #[test]
    fn test_all_zero_frame_fails_on_snr_sentinel() {
        let pixels = Array2::<f32>::zeros((4, 4));
        let check = DarkFrameValidator::default().check(pixels.view()).unwrap();

        assert_eq!(check.mean, 0.0);
        assert_eq!(check.std, 0.0);
        assert_eq!(check.snr_db, SNR_UNDEFINED_DB);
        assert!(!check.is_valid);
    }

    #[test]
    fn test_noisy_frame_is_invalid() {
        // SNR below 10 dB
        assert!(!DarkFrameValidator::default().evaluate(0.02, 0.01).is_valid);

        // Spread too wide once the SNR bound is relaxed
        let relaxed = AnalysisConfig {
            min_snr_db: 0.0,
            ..AnalysisConfig::default()
        };
        let validator = DarkFrameValidator::from_config(&relaxed);
        assert!(validator.evaluate(0.09, 0.04).is_valid);
        assert!(!validator.evaluate(0.09, 0.06).is_valid);
    }

    #[test]
    fn test_limits_follow_config() {
        let config = AnalysisConfig {
            max_dark_mean: 0.6,
            ..AnalysisConfig::default()
        };
        let check = DarkFrameValidator::from_config(&config).evaluate(0.5, 0.01);
        assert!(check.is_valid);
    }
}
