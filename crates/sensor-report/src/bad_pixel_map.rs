//! Bad pixel map export for downstream defect correction
//!
//! Coordinates are `(x, y)` in row-major scan order, as produced by the
//! detector masks.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use frame_loader::FrameInfo;
use sensor_analysis::DefectMasks;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadPixelMap {
    /// File the map was derived from
    pub source: String,
    pub width: usize,
    pub height: usize,
    pub generated_at: DateTime<Local>,
    pub hot_pixels: Vec<(usize, usize)>,
    pub dead_pixels: Vec<(usize, usize)>,
}

impl BadPixelMap {
    pub fn from_masks(frame: &FrameInfo, masks: &DefectMasks) -> Self {
        let (height, width) = masks.hot.dim();
        Self {
            source: frame.file_name.clone(),
            width,
            height,
            generated_at: Local::now(),
            hot_pixels: masks.hot_coordinates(),
            dead_pixels: masks.dead_coordinates(),
        }
    }

    pub fn num_bad_pixels(&self) -> usize {
        self.hot_pixels.len() + self.dead_pixels.len()
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write bad pixel map {}", path.display()))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read bad pixel map {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("Invalid bad pixel map {}", path.display()))
    }
}
