//! Parallel analysis of many frames
//!
//! Each frame is decoded and analysed independently on a rayon pool.
//! Results come back in input order regardless of completion order.

use crate::decode::{load_frame, FrameInfo};
use crate::error::FrameError;
use chrono::{DateTime, Local};
use rayon::prelude::*;
use sensor_analysis::{AnalysisResult, DefectMasks, SensorAnalyzer};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Worker threads; `None` uses the global rayon pool
    pub jobs: Option<usize>,
    /// Stop starting new frames after the first failure
    pub fail_fast: bool,
    /// Keep per-pixel defect masks in the results
    pub keep_masks: bool,
}

/// A successfully analysed frame
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    pub info: FrameInfo,
    pub result: AnalysisResult,
    pub masks: Option<DefectMasks>,
    /// When the analysis of this frame finished
    pub analyzed_at: DateTime<Local>,
}

#[derive(Debug)]
pub struct BatchOutcome {
    /// One entry per input path, in input order
    pub results: Vec<Result<FrameAnalysis, FrameError>>,
    /// Set when a failure stopped a fail-fast batch, whether or not any
    /// frame was left to cancel
    pub aborted: bool,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> impl Iterator<Item = &FrameAnalysis> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FrameError> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }
}

/// Decode and analyse a single frame
pub fn analyze_frame(path: &Path, analyzer: &SensorAnalyzer, keep_masks: bool) -> Result<FrameAnalysis, FrameError> {
    let frame = load_frame(path)?;
    let (result, masks) = analyzer
        .analyze_with_masks(frame.pixels.view())
        .map_err(|source| FrameError::Analysis {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(FrameAnalysis {
        info: frame.info,
        result,
        masks: keep_masks.then_some(masks),
        analyzed_at: Local::now(),
    })
}

/// Analyse `paths` in parallel, calling `progress(done, total)` after each frame
pub fn analyze_batch<F>(
    paths: &[PathBuf],
    analyzer: &SensorAnalyzer,
    options: &BatchOptions,
    progress: F,
) -> BatchOutcome
where
    F: Fn(usize, usize) + Send + Sync,
{
    let total = paths.len();
    let completed = AtomicUsize::new(0);
    let cancel_flag = AtomicBool::new(false);

    let run = || -> Vec<Result<FrameAnalysis, FrameError>> {
        paths
            .par_iter()
            .map(|path| {
                let result = if cancel_flag.load(Ordering::Relaxed) {
                    Err(FrameError::Cancelled { path: path.clone() })
                } else {
                    analyze_frame(path, analyzer, options.keep_masks)
                };

                if let Err(e) = &result {
                    if !e.is_cancelled() {
                        log::warn!("Skipping {}: {}", path.display(), e);
                        if options.fail_fast {
                            cancel_flag.store(true, Ordering::Relaxed);
                        }
                    }
                }

                let current = completed.fetch_add(1, Ordering::Relaxed) + 1;
                progress(current, total);
                result
            })
            .collect()
    };

    let results = match options.jobs {
        Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(run),
            Err(e) => {
                log::warn!("Could not start a pool of {} threads ({}), using the default pool", jobs, e);
                run()
            }
        },
        None => run(),
    };

    let aborted = cancel_flag.load(Ordering::Relaxed);
    if aborted {
        let cancelled = results.iter().filter(|r| matches!(r, Err(e) if e.is_cancelled())).count();
        log::warn!("Batch aborted after a failure; {} frame(s) were not analysed", cancelled);
    }

    BatchOutcome { results, aborted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use std::sync::Mutex;

    fn write_dark_png(dir: &Path, name: &str, hot: Option<(u32, u32)>) -> PathBuf {
        let path = dir.join(name);
        let mut img = GrayImage::from_fn(32, 32, |x, y| Luma([10 + ((x + 3 * y) % 5) as u8]));
        if let Some((x, y)) = hot {
            img.put_pixel(x, y, Luma([255]));
        }
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_analyze_frame_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dark_png(dir.path(), "one.png", Some((4, 9)));

        let before = Local::now();
        let analysis = analyze_frame(&path, &SensorAnalyzer::default(), true).unwrap();
        assert!(analysis.analyzed_at >= before);
        assert_eq!(analysis.info.file_name, "one.png");
        assert_eq!(analysis.result.hot_pixels, 1);
        assert_eq!(analysis.masks.unwrap().hot_coordinates(), vec![(4, 9)]);
    }

    #[test]
    fn test_batch_keeps_input_order_and_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_dark_png(dir.path(), "a.png", None);
        let broken = dir.path().join("b.png");
        std::fs::write(&broken, b"broken").unwrap();
        let third = write_dark_png(dir.path(), "c.png", Some((1, 1)));
        let paths = vec![first.clone(), broken.clone(), third.clone()];

        let calls = Mutex::new(Vec::new());
        let outcome = analyze_batch(
            &paths,
            &SensorAnalyzer::default(),
            &BatchOptions {
                jobs: Some(2),
                ..BatchOptions::default()
            },
            |done, total| calls.lock().unwrap().push((done, total)),
        );

        assert!(!outcome.aborted);
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.results[0].as_ref().unwrap().info.path, first);
        assert_eq!(outcome.results[1].as_ref().unwrap_err().path(), broken.as_path());
        assert_eq!(outcome.results[2].as_ref().unwrap().result.hot_pixels, 1);
        assert_eq!(outcome.success_count(), 2);
        assert_eq!(outcome.failure_count(), 1);
        assert!(outcome.succeeded().all(|a| a.masks.is_none()));

        let mut calls = calls.into_inner().unwrap();
        calls.sort();
        assert_eq!(calls, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_fail_fast_cancels_pending_frames() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        let mut paths = vec![missing];
        for i in 0..6 {
            paths.push(write_dark_png(dir.path(), &format!("frame{i}.png"), None));
        }

        let outcome = analyze_batch(
            &paths,
            &SensorAnalyzer::default(),
            &BatchOptions {
                jobs: Some(1),
                fail_fast: true,
                keep_masks: false,
            },
            |_, _| {},
        );

        assert_eq!(outcome.results.len(), 7);
        assert!(outcome.aborted);
        assert!(matches!(
            outcome.results[0],
            Err(FrameError::Load(crate::LoadError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_fail_fast_on_last_frame_still_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_dark_png(dir.path(), "good.png", None);
        let missing = dir.path().join("missing.png");

        let outcome = analyze_batch(
            &[good, missing],
            &SensorAnalyzer::default(),
            &BatchOptions {
                jobs: Some(1),
                fail_fast: true,
                keep_masks: false,
            },
            |_, _| {},
        );

        // Nothing was left to cancel, the failure alone aborts the batch
        assert_eq!(outcome.success_count(), 1);
        assert_eq!(outcome.failure_count(), 1);
        assert!(outcome.failed().all(|e| !e.is_cancelled()));
        assert!(outcome.aborted);
    }

    #[test]
    fn test_fail_fast_with_more_jobs_than_frames() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, b"broken").unwrap();
        let paths = vec![write_dark_png(dir.path(), "a.png", None), broken];

        let options = BatchOptions {
            jobs: Some(8),
            fail_fast: true,
            keep_masks: false,
        };
        let outcome = analyze_batch(&paths, &SensorAnalyzer::default(), &options, |_, _| {});
        assert!(outcome.aborted);

        // Without fail-fast the same failure is only skipped
        let outcome = analyze_batch(
            &paths,
            &SensorAnalyzer::default(),
            &BatchOptions {
                fail_fast: false,
                ..options
            },
            |_, _| {},
        );
        assert_eq!(outcome.failure_count(), 1);
        assert!(!outcome.aborted);
    }

    #[test]
    fn test_empty_batch() {
        let outcome = analyze_batch(&[], &SensorAnalyzer::default(), &BatchOptions::default(), |_, _| {});
        assert!(outcome.results.is_empty());
        assert!(!outcome.aborted);
    }
}
