//! Report file layout on disk
//!
//! Every file name carries the run timestamp (`%Y%m%d_%H%M%S`, local time) so
//! repeated runs over the same frame never overwrite each other.

use crate::bad_pixel_map::BadPixelMap;
use crate::report::{BatchReport, ImageReport};
use crate::summary::{write_batch_csv, write_summary_csv};
use crate::text::render_report;
use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Paths of the files written for one image
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenReport {
    pub json: PathBuf,
    pub text: PathBuf,
    pub csv: PathBuf,
}

impl WrittenReport {
    pub fn paths(&self) -> Vec<PathBuf> {
        vec![self.json.clone(), self.csv.clone(), self.text.clone()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrittenBatch {
    pub json: PathBuf,
    pub csv: PathBuf,
}

pub struct ReportWriter {
    output_dir: PathBuf,
    timestamp: String,
}

impl ReportWriter {
    /// Create the output directory if needed and stamp the run with the current time
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self::with_timestamp(output_dir, timestamp)
    }

    pub fn with_timestamp(output_dir: impl Into<PathBuf>, timestamp: impl Into<String>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
        Ok(Self {
            output_dir,
            timestamp: timestamp.into(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn file_path(&self, prefix: &str, stem: Option<&str>, extension: &str) -> PathBuf {
        let name = match stem {
            Some(stem) => format!("{prefix}_{stem}_{}.{extension}", self.timestamp),
            None => format!("{prefix}_{}.{extension}", self.timestamp),
        };
        self.output_dir.join(name)
    }

    /// Write the JSON record, CSV summary and text report of one frame
    pub fn write_image_report(&self, report: &ImageReport) -> Result<WrittenReport> {
        let stem = report.frame.stem();
        let written = WrittenReport {
            json: self.file_path("result", Some(&stem), "json"),
            csv: self.file_path("summary", Some(&stem), "csv"),
            text: self.file_path("diagnostic", Some(&stem), "txt"),
        };

        write_json(report, &written.json)?;
        write_summary_csv(report, &written.csv)?;

        let text = render_report(report, &written.paths());
        std::fs::write(&written.text, text)
            .with_context(|| format!("Failed to write report {}", written.text.display()))?;

        log::info!("Reports for {} written to {}", report.file, self.output_dir.display());
        Ok(written)
    }

    /// Write the consolidated JSON and CSV of a batch run
    pub fn write_batch_report(&self, batch: &BatchReport) -> Result<WrittenBatch> {
        let written = WrittenBatch {
            json: self.file_path("batch", None, "json"),
            csv: self.file_path("batch", None, "csv"),
        };

        write_json(batch, &written.json)?;
        write_batch_csv(batch, &written.csv)?;

        log::info!(
            "Batch report for {} frame(s) written to {}",
            batch.analyzed_count(),
            self.output_dir.display()
        );
        Ok(written)
    }

    pub fn write_bad_pixel_map(&self, map: &BadPixelMap, stem: &str) -> Result<PathBuf> {
        let path = self.file_path("bad_pixels", Some(stem), "json");
        map.save_to_file(&path)?;
        log::debug!("Bad pixel map with {} entries written to {}", map.num_bad_pixels(), path.display());
        Ok(path)
    }
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
