//! Findings that deserve the user's attention beyond the grade

use sensor_analysis::quality::{CAPTURE_SNR_FLOOR_DB, NOT_A_DARK_FRAME, SEVERE_HOT_PERCENTAGE};
use sensor_analysis::AnalysisResult;
use serde::{Deserialize, Serialize};

/// Steps for capturing a usable dark frame
pub const CAPTURE_STEPS: [&str; 4] = [
    "Lens cap on the LENS (not the camera body)",
    "ISO 100-400",
    "Exposure of 1-30 seconds",
    "Room temperature (20-25 C)",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    LowSnr { snr_db: f64 },
    ExcessiveHotPixels { count: usize, percentage: f64 },
    HighMean { mean: f64, limit: f64 },
    CaptureInstructions,
}

impl Diagnostic {
    /// Human-readable lines: a headline followed by indented detail
    pub fn lines(&self) -> Vec<String> {
        match self {
            Diagnostic::LowSnr { snr_db } => vec![
                format!("SNR VERY LOW ({snr_db:.2} dB): this does NOT look like a real dark frame"),
                "   -> Possible light in the image or extreme ISO".to_string(),
            ],
            Diagnostic::ExcessiveHotPixels { count, percentage } => vec![
                format!(
                    "EXCESSIVE HOT PIXELS: {} ({:.3}%)",
                    crate::group_thousands(*count),
                    percentage
                ),
                "   -> Sensor overheated or damaged".to_string(),
            ],
            Diagnostic::HighMean { mean, limit } => vec![
                format!("HIGH MEAN: {mean:.4} (must be < {limit} for a dark frame)"),
                "   -> Not a pure dark frame".to_string(),
            ],
            Diagnostic::CaptureInstructions => {
                let mut lines = vec!["RECOMMENDATION: capture a proper dark frame:".to_string()];
                lines.extend(
                    CAPTURE_STEPS
                        .iter()
                        .enumerate()
                        .map(|(i, step)| format!("   {}. {}", i + 1, step)),
                );
                lines
            }
        }
    }
}

/// Derive the ordered list of findings for one analysis
pub fn diagnose(result: &AnalysisResult) -> Vec<Diagnostic> {
    let mut findings = Vec::new();

    if result.snr_db < CAPTURE_SNR_FLOOR_DB {
        findings.push(Diagnostic::LowSnr { snr_db: result.snr_db });
    }

    if result.hot_percentage > SEVERE_HOT_PERCENTAGE {
        findings.push(Diagnostic::ExcessiveHotPixels {
            count: result.hot_pixels,
            percentage: result.hot_percentage,
        });
    }

    if result.stats.mean > result.config.max_dark_mean {
        findings.push(Diagnostic::HighMean {
            mean: result.stats.mean,
            limit: result.config.max_dark_mean,
        });
    }

    if result.recommendation == NOT_A_DARK_FRAME {
        findings.push(Diagnostic::CaptureInstructions);
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use sensor_analysis::SensorAnalyzer;

    #[test]
    fn test_bright_flat_frame_gets_every_capture_warning() {
        // Flat mid-gray: SNR sentinel, mean ~0.5, no defects
        let raw = Array2::from_elem((20, 20), 128.0f32);
        let result = SensorAnalyzer::default().analyze(raw.view()).unwrap();

        let findings = diagnose(&result);
        assert_eq!(findings.len(), 3);
        assert!(matches!(findings[0], Diagnostic::LowSnr { snr_db } if snr_db == -100.0));
        assert!(matches!(findings[1], Diagnostic::HighMean { limit, .. } if limit == 0.1));
        assert_eq!(findings[2], Diagnostic::CaptureInstructions);
    }

    #[test]
    fn test_many_hot_pixels_flagged() {
        // 1 in 100 pixels saturated: 1% hot
        let raw = Array2::from_shape_fn((100, 100), |(y, x)| {
            if x % 10 == 0 && y % 10 == 0 {
                65535.0
            } else {
                400.0 + ((x + 2 * y) % 7) as f32
            }
        });
        let result = SensorAnalyzer::default().analyze(raw.view()).unwrap();
        assert_eq!(result.hot_pixels, 100);

        let findings = diagnose(&result);
        assert!(findings
            .iter()
            .any(|d| matches!(d, Diagnostic::ExcessiveHotPixels { count: 100, .. })));
    }

    #[test]
    fn test_diagnostic_lines() {
        let lines = Diagnostic::ExcessiveHotPixels {
            count: 12345,
            percentage: 0.5,
        }
        .lines();
        assert_eq!(lines[0], "EXCESSIVE HOT PIXELS: 12,345 (0.500%)");

        let capture = Diagnostic::CaptureInstructions.lines();
        assert_eq!(capture.len(), 1 + CAPTURE_STEPS.len());
        assert!(capture[1].starts_with("   1. Lens cap"));
    }

    #[test]
    fn test_diagnostic_json_shape() {
        let json = serde_json::to_value(Diagnostic::HighMean { mean: 0.5, limit: 0.1 }).unwrap();
        assert_eq!(json["kind"], "high_mean");
        assert_eq!(json["mean"], 0.5);
    }
}
