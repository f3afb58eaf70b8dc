//! Report records serialized to disk
//!
//! An `ImageReport` is the complete, self-describing outcome for one frame:
//! where it came from, when it was analysed, every measured value and the
//! derived diagnostics. A `BatchReport` bundles the reports of a directory run
//! together with the files that could not be analysed.

use crate::diagnostics::{diagnose, Diagnostic};
use chrono::{DateTime, Local};
use frame_loader::{BatchOutcome, FrameAnalysis, FrameInfo};
use sensor_analysis::{AnalysisResult, QualityGrade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReport {
    pub file: String,
    pub analyzed_at: DateTime<Local>,
    pub frame: FrameInfo,
    pub result: AnalysisResult,
    pub diagnostics: Vec<Diagnostic>,
}

impl ImageReport {
    pub fn at(frame: FrameInfo, result: AnalysisResult, analyzed_at: DateTime<Local>) -> Self {
        let diagnostics = diagnose(&result);
        Self {
            file: frame.file_name.clone(),
            analyzed_at,
            frame,
            result,
            diagnostics,
        }
    }

    /// Report stamped with the time the frame itself was analysed
    pub fn from_analysis(analysis: &FrameAnalysis) -> Self {
        Self::at(analysis.info.clone(), analysis.result.clone(), analysis.analyzed_at)
    }

    pub fn grade(&self) -> QualityGrade {
        self.result.grade
    }
}

/// A frame of a batch that produced no report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Local>,
    pub total_files: usize,
    pub aborted: bool,
    pub grade_counts: BTreeMap<QualityGrade, usize>,
    pub reports: Vec<ImageReport>,
    pub failures: Vec<FailureRecord>,
}

impl BatchReport {
    pub fn from_outcome(outcome: &BatchOutcome) -> Self {
        let generated_at = Local::now();
        let reports: Vec<ImageReport> = outcome.succeeded().map(ImageReport::from_analysis).collect();
        let failures = outcome
            .failed()
            .map(|err| FailureRecord {
                path: err.path().to_path_buf(),
                error: err.to_string(),
            })
            .collect();

        Self::assemble(reports, failures, outcome.results.len(), outcome.aborted, generated_at)
    }

    pub fn assemble(
        reports: Vec<ImageReport>,
        failures: Vec<FailureRecord>,
        total_files: usize,
        aborted: bool,
        generated_at: DateTime<Local>,
    ) -> Self {
        let mut grade_counts = BTreeMap::new();
        for report in &reports {
            *grade_counts.entry(report.grade()).or_insert(0) += 1;
        }

        Self {
            generated_at,
            total_files,
            aborted,
            grade_counts,
            reports,
            failures,
        }
    }

    pub fn analyzed_count(&self) -> usize {
        self.reports.len()
    }

    /// Reports with grade D
    pub fn deficient(&self) -> impl Iterator<Item = &ImageReport> {
        self.reports.iter().filter(|r| r.grade().is_deficient())
    }
}
