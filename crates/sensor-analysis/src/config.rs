//! Analysis thresholds
//!
//! `AnalysisConfig` holds every tunable used by the dark frame check and the
//! defect detector. Defaults are tuned for DSLR dark frames and are strict
//! enough to keep false positives low on 20+ megapixel sensors.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Sigma multiplier above the mean for the hot pixel threshold
    pub hot_pixel_sigma: f64,
    /// Sigma multiplier below the mean for the dead pixel threshold
    pub dead_pixel_sigma: f64,
    /// IQR multiplier above Q3 for the hot pixel threshold
    pub hot_pixel_iqr_mult: f64,
    /// IQR multiplier below Q1 for the dead pixel threshold
    pub dead_pixel_iqr_mult: f64,
    /// MAD multiplier above the median for the hot pixel threshold
    pub hot_pixel_mad_mult: f64,
    /// MAD multiplier below the median for the dead pixel threshold
    pub dead_pixel_mad_mult: f64,
    /// A dark frame must have an SNR strictly above this (dB)
    pub min_snr_db: f64,
    /// A dark frame must have a normalized mean strictly below this
    pub max_dark_mean: f64,
    /// A dark frame must have a normalized standard deviation strictly below this
    pub max_dark_std: f64,
    /// Warn loudly when the frame does not look like a dark frame.
    /// The check always runs; it never blocks the analysis.
    pub require_dark_frame: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hot_pixel_sigma: 6.0,
            dead_pixel_sigma: 6.0,
            hot_pixel_iqr_mult: 3.5,
            dead_pixel_iqr_mult: 3.5,
            hot_pixel_mad_mult: 4.0,
            dead_pixel_mad_mult: 4.0,
            min_snr_db: 10.0,
            max_dark_mean: 0.1,
            max_dark_std: 0.05,
            require_dark_frame: true,
        }
    }
}

impl AnalysisConfig {
    /// Parse a TOML document; keys that are absent keep their default value
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| AnalysisError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Reject multipliers and limits that would make the thresholds meaningless
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("hot_pixel_sigma", self.hot_pixel_sigma),
            ("dead_pixel_sigma", self.dead_pixel_sigma),
            ("hot_pixel_iqr_mult", self.hot_pixel_iqr_mult),
            ("dead_pixel_iqr_mult", self.dead_pixel_iqr_mult),
            ("hot_pixel_mad_mult", self.hot_pixel_mad_mult),
            ("dead_pixel_mad_mult", self.dead_pixel_mad_mult),
            ("max_dark_mean", self.max_dark_mean),
            ("max_dark_std", self.max_dark_std),
        ];

        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        if !self.min_snr_db.is_finite() {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_snr_db must be finite (got {})",
                self.min_snr_db
            )));
        }

        Ok(())
    }
}
