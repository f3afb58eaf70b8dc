//! End-to-end sensor analysis of one frame
//!
//! raw samples -> normalized frame -> statistics -> dark frame check ->
//! defect masks -> quality grade. Each call is independent; the analyzer
//! holds nothing but its configuration and can be shared across threads.

use crate::config::AnalysisConfig;
use crate::dark_frame::{DarkFrameCheck, DarkFrameValidator};
use crate::detector::{DefectDetector, DefectMasks, DefectThresholds};
use crate::error::Result;
use crate::normalize::{normalize, BitDepth};
use crate::quality::{QualityClassifier, QualityGrade};
use crate::stats::BasicStats;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Everything measured and decided about one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub width: usize,
    pub height: usize,
    pub total_pixels: usize,
    pub bit_depth: BitDepth,
    pub stats: BasicStats,
    pub hot_pixels: usize,
    pub dead_pixels: usize,
    pub hot_percentage: f64,
    pub dead_percentage: f64,
    pub snr_db: f64,
    pub dark_frame: DarkFrameCheck,
    pub grade: QualityGrade,
    pub recommendation: String,
    pub thresholds: DefectThresholds,
    pub config: AnalysisConfig,
}

impl AnalysisResult {
    /// Resolution as `WIDTHxHEIGHT`
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    pub fn total_defects(&self) -> usize {
        self.hot_pixels + self.dead_pixels
    }

    pub fn total_defect_percentage(&self) -> f64 {
        self.hot_percentage + self.dead_percentage
    }
}

#[derive(Debug, Clone, Default)]
pub struct SensorAnalyzer {
    config: AnalysisConfig,
}

impl SensorAnalyzer {
    /// Create an analyzer, rejecting an invalid configuration up front
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a grayscale frame of raw sample values
    pub fn analyze(&self, raw: ArrayView2<'_, f32>) -> Result<AnalysisResult> {
        self.analyze_with_masks(raw).map(|(result, _)| result)
    }

    /// Analyze a frame and also return the per-pixel defect masks
    pub fn analyze_with_masks(&self, raw: ArrayView2<'_, f32>) -> Result<(AnalysisResult, DefectMasks)> {
        // Step 1: Rescale to [0, 1]
        let frame = normalize(raw)?;
        log::info!("Detected bit depth: {}", frame.bit_depth);

        // Step 2: One pass of statistics feeds both the dark check and the detector
        let stats = BasicStats::compute(frame.pixels.view())?;

        // Step 3: Check the frame really is a dark frame (advisory only)
        let dark_frame = DarkFrameValidator::from_config(&self.config).evaluate(stats.mean, stats.std);
        if !dark_frame.is_valid {
            if self.config.require_dark_frame {
                log::warn!("This does NOT look like a valid dark frame");
                log::warn!(
                    "Mean: {:.4}, std: {:.4}, SNR: {:.1} dB",
                    dark_frame.mean,
                    dark_frame.std,
                    dark_frame.snr_db
                );
            } else {
                log::debug!(
                    "Dark frame check failed (mean {:.4}, SNR {:.1} dB), not required",
                    dark_frame.mean,
                    dark_frame.snr_db
                );
            }
        }

        // Step 4: Consensus detection
        let detection = DefectDetector::detect(frame.pixels.view(), &stats, &self.config);
        log::debug!("Thresholds: {:?}", detection.thresholds);
        log::info!(
            "Detected {} hot and {} dead pixels out of {}",
            detection.hot_pixels,
            detection.dead_pixels,
            detection.total_pixels
        );

        // Step 5: Grade the sensor
        let snr_db = dark_frame.snr_db;
        let classification =
            QualityClassifier::classify(detection.hot_percentage, detection.dead_percentage, snr_db);

        let result = AnalysisResult {
            width: frame.width(),
            height: frame.height(),
            total_pixels: detection.total_pixels,
            bit_depth: frame.bit_depth,
            stats,
            hot_pixels: detection.hot_pixels,
            dead_pixels: detection.dead_pixels,
            hot_percentage: detection.hot_percentage,
            dead_percentage: detection.dead_percentage,
            snr_db,
            dark_frame,
            grade: classification.grade,
            recommendation: classification.recommendation,
            thresholds: detection.thresholds,
            config: self.config.clone(),
        };

        Ok((result, detection.masks))
    }
}
