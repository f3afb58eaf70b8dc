//! CSV summaries: a field/value sheet per image and one row per image for a batch

use crate::group_thousands;
use crate::report::{BatchReport, ImageReport};
use anyhow::{Context, Result};
use std::path::Path;

/// Field/value pairs shown in the per-image summary
pub fn summary_rows(report: &ImageReport) -> Vec<(&'static str, String)> {
    let r = &report.result;
    vec![
        ("File", report.file.clone()),
        ("Resolution", r.resolution()),
        ("Bit Depth", r.bit_depth.to_string()),
        ("Total Pixels", group_thousands(r.total_pixels)),
        ("Hot Pixels", group_thousands(r.hot_pixels)),
        ("Dead Pixels", group_thousands(r.dead_pixels)),
        ("% Hot", format!("{:.6}%", r.hot_percentage)),
        ("% Dead", format!("{:.6}%", r.dead_percentage)),
        ("Grade", r.grade.to_string()),
        ("Recommendation", r.recommendation.clone()),
        ("SNR (dB)", format!("{:.2}", r.snr_db)),
        ("Mean", format!("{:.4}", r.stats.mean)),
        ("Std Dev", format!("{:.4}", r.stats.std)),
        ("Analyzed At", report.analyzed_at.to_rfc3339()),
    ]
}

pub fn write_summary_csv(report: &ImageReport, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create summary {}", path.display()))?;
    wtr.write_record(["Field", "Value"])?;
    for (field, value) in summary_rows(report) {
        wtr.write_record([field, value.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub const BATCH_COLUMNS: [&str; 12] = [
    "file",
    "resolution",
    "bit_depth",
    "hot_pixels",
    "dead_pixels",
    "hot_percentage",
    "dead_percentage",
    "snr_db",
    "mean",
    "std",
    "grade",
    "recommendation",
];

pub fn write_batch_csv(batch: &BatchReport, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create batch summary {}", path.display()))?;
    wtr.write_record(BATCH_COLUMNS)?;

    for report in &batch.reports {
        let r = &report.result;
        wtr.write_record(&[
            report.file.clone(),
            r.resolution(),
            r.bit_depth.bits().to_string(),
            r.hot_pixels.to_string(),
            r.dead_pixels.to_string(),
            format!("{:.6}", r.hot_percentage),
            format!("{:.6}", r.dead_percentage),
            format!("{:.2}", r.snr_db),
            format!("{:.6}", r.stats.mean),
            format!("{:.6}", r.stats.std),
            r.grade.to_string(),
            r.recommendation.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
