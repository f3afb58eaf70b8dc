//! Sensor quality grading
//!
//! Maps defect percentages and SNR onto a five-step grade. The tiers are
//! checked from best to worst and the first one whose three bounds all hold
//! wins; the bounds of neighbouring tiers overlap, so the order matters.

use serde::{Deserialize, Serialize};

/// Grades ordered from best (`APlus`) to worst (`D`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
}

impl QualityGrade {
    /// Human-readable tier description
    pub fn description(&self) -> &'static str {
        match self {
            QualityGrade::APlus => "Excellent - Professional",
            QualityGrade::A => "Good - Advanced",
            QualityGrade::B => "Acceptable - Enthusiast",
            QualityGrade::C => "Basic - Consumer",
            QualityGrade::D => "Deficient - Needs attention",
        }
    }

    /// Grade and description, e.g. `A+ (Excellent - Professional)`
    pub fn label(&self) -> String {
        format!("{} ({})", self, self.description())
    }

    pub fn is_deficient(&self) -> bool {
        *self == QualityGrade::D
    }
}

impl std::fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityGrade::APlus => write!(f, "A+"),
            QualityGrade::A => write!(f, "A"),
            QualityGrade::B => write!(f, "B"),
            QualityGrade::C => write!(f, "C"),
            QualityGrade::D => write!(f, "D"),
        }
    }
}

impl std::str::FromStr for QualityGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A+" => Ok(QualityGrade::APlus),
            "A" => Ok(QualityGrade::A),
            "B" => Ok(QualityGrade::B),
            "C" => Ok(QualityGrade::C),
            "D" => Ok(QualityGrade::D),
            _ => Err(format!("Invalid quality grade: {s}. Valid options: A+, A, B, C, D")),
        }
    }
}

struct GradeTier {
    grade: QualityGrade,
    max_hot_percentage: f64,
    max_dead_percentage: f64,
    min_snr_db: f64,
    recommendation: &'static str,
}

const GRADE_TIERS: [GradeTier; 4] = [
    GradeTier {
        grade: QualityGrade::APlus,
        max_hot_percentage: 0.001,
        max_dead_percentage: 0.0005,
        min_snr_db: 30.0,
        recommendation: "Sensor in optimal condition",
    },
    GradeTier {
        grade: QualityGrade::A,
        max_hot_percentage: 0.005,
        max_dead_percentage: 0.002,
        min_snr_db: 25.0,
        recommendation: "Sensor suitable for professional use",
    },
    GradeTier {
        grade: QualityGrade::B,
        max_hot_percentage: 0.01,
        max_dead_percentage: 0.005,
        min_snr_db: 20.0,
        recommendation: "Suitable for advanced photography",
    },
    GradeTier {
        grade: QualityGrade::C,
        max_hot_percentage: 0.02,
        max_dead_percentage: 0.01,
        min_snr_db: 15.0,
        recommendation: "Acceptable for general use",
    },
];

/// Below this SNR a grade D frame is treated as a failed capture
pub const CAPTURE_SNR_FLOOR_DB: f64 = 10.0;
/// Above this hot pixel share a grade D sensor needs urgent review
pub const SEVERE_HOT_PERCENTAGE: f64 = 0.1;

pub const NOT_A_DARK_FRAME: &str = "Not a valid dark frame. Verify the capture";
pub const SEVERE_DEFECTS: &str = "Sensor with severe defects. Urgent review required";
pub const NEEDS_CALIBRATION: &str = "Sensor needs calibration or repair";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub grade: QualityGrade,
    pub recommendation: String,
}

pub struct QualityClassifier;

impl QualityClassifier {
    /// Grade a sensor from its defect percentages (in percent) and SNR (dB)
    pub fn classify(hot_percentage: f64, dead_percentage: f64, snr_db: f64) -> Classification {
        let tier = GRADE_TIERS.iter().find(|tier| {
            hot_percentage < tier.max_hot_percentage
                && dead_percentage < tier.max_dead_percentage
                && snr_db > tier.min_snr_db
        });

        if let Some(tier) = tier {
            return Classification {
                grade: tier.grade,
                recommendation: tier.recommendation.to_string(),
            };
        }

        let recommendation = if snr_db < CAPTURE_SNR_FLOOR_DB {
            NOT_A_DARK_FRAME
        } else if hot_percentage > SEVERE_HOT_PERCENTAGE {
            SEVERE_DEFECTS
        } else {
            NEEDS_CALIBRATION
        };

        Classification {
            grade: QualityGrade::D,
            recommendation: recommendation.to_string(),
        }
    }
}
