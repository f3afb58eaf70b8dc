//! Consensus voting on a bimodal frame
//!
//! 4999 pixels sit at 0.0 and 5000 at 0.1, plus one probe pixel. For
//! that layout the thresholds are roughly:
//! sigma hot ~0.35, IQR hot 0.45, MAD hot `0.1 + k * 0.05`.

use ndarray::Array2;
use sensor_analysis::{AnalysisConfig, BasicStats, DefectDetector};

const PROBE: [usize; 2] = [80, 17];

fn bimodal_frame(probe: f32) -> Array2<f32> {
    let mut pixels = Array2::from_shape_fn((100, 100), |(y, x)| if y * 100 + x < 4999 { 0.0 } else { 0.1 });
    pixels[PROBE] = probe;
    pixels
}

fn wide_mad_config() -> AnalysisConfig {
    AnalysisConfig {
        hot_pixel_mad_mult: 10.0,
        ..AnalysisConfig::default()
    }
}

#[test]
fn test_bimodal_statistics() {
    let stats = BasicStats::compute(bimodal_frame(0.4).view()).unwrap();

    assert!(stats.q1.abs() < 1e-9);
    assert!((stats.q3 - 0.1).abs() < 1e-6);
    assert!((stats.median - 0.1).abs() < 1e-6);
    assert!((stats.mad - 0.05).abs() < 1e-6);
}

#[test]
fn test_sigma_vote_alone_does_not_flag() {
    let pixels = bimodal_frame(0.4);
    let stats = BasicStats::compute(pixels.view()).unwrap();
    let detection = DefectDetector::detect(pixels.view(), &stats, &wide_mad_config());

    assert_eq!(detection.thresholds.hot_votes(0.4), 1);
    assert_eq!(detection.hot_pixels, 0);
    assert_eq!(detection.dead_pixels, 0);
}

#[test]
fn test_sigma_and_iqr_votes_flag() {
    let pixels = bimodal_frame(0.5);
    let stats = BasicStats::compute(pixels.view()).unwrap();
    let detection = DefectDetector::detect(pixels.view(), &stats, &wide_mad_config());

    assert_eq!(detection.thresholds.hot_votes(0.5), 2);
    assert_eq!(detection.hot_pixels, 1);
    assert_eq!(detection.masks.hot_coordinates(), vec![(PROBE[1], PROBE[0])]);
    assert_eq!(detection.dead_pixels, 0);
}

#[test]
fn test_default_mad_multiplier_joins_sigma() {
    // With k = 4 the MAD threshold drops to 0.3 and agrees with sigma
    let pixels = bimodal_frame(0.4);
    let stats = BasicStats::compute(pixels.view()).unwrap();
    let detection = DefectDetector::detect(pixels.view(), &stats, &AnalysisConfig::default());

    assert_eq!(detection.thresholds.hot_votes(0.4), 2);
    assert_eq!(detection.hot_pixels, 1);
}
