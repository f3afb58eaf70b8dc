//! Reporting for PixelCheck analyses
//!
//! Turns analysis results into diagnostics and writes them out as JSON
//! records, CSV summaries, plain-text reports and bad pixel maps.

pub mod bad_pixel_map;
pub mod diagnostics;
pub mod report;
pub mod summary;
pub mod text;
pub mod writer;

pub use bad_pixel_map::BadPixelMap;
pub use diagnostics::{diagnose, Diagnostic};
pub use report::{BatchReport, FailureRecord, ImageReport};
pub use text::render_report;
pub use writer::{ReportWriter, WrittenBatch, WrittenReport};

/// Format a count with `,` thousands separators
pub fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
