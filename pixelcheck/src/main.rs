mod cli;
mod console;
mod logging;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use frame_loader::{analyze_batch, analyze_frame, scan_directory, BatchOptions, FrameAnalysis};
use sensor_analysis::SensorAnalyzer;
use sensor_report::{BadPixelMap, BatchReport, ImageReport, ReportWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const BANNER: &str = "PIXELCHECK - DARK FRAME SENSOR ANALYSIS";

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = logging::level_for(cli.verbose, cli.quiet);
    if let Err(e) = logging::init(level, cli.log_file.as_deref()) {
        eprintln!("ERROR: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("Analysis failed: {e:#}");
            eprintln!("\nERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the run succeeded
fn run(cli: Cli) -> Result<bool> {
    let config = settings::resolve_config(&cli.tuning)?;
    let analyzer = SensorAnalyzer::new(config)?;

    println!("{BANNER}");
    println!("{}", "=".repeat(BANNER.len()));

    match cli.command {
        Command::Analyze { file, bad_pixel_map } => analyze_single(
            &file,
            &analyzer,
            &cli.output_dir,
            bad_pixel_map,
            cli.log_file.as_deref(),
        ),
        Command::Batch {
            dir,
            jobs,
            fail_fast,
            bad_pixel_map,
        } => {
            let options = BatchOptions {
                jobs,
                fail_fast,
                keep_masks: bad_pixel_map,
            };
            analyze_directory(&dir, &analyzer, &cli.output_dir, &options)
        }
    }
}

fn analyze_single(
    file: &Path,
    analyzer: &SensorAnalyzer,
    output_dir: &Path,
    bad_pixel_map: bool,
    log_file: Option<&Path>,
) -> Result<bool> {
    let name = file.file_name().unwrap_or(file.as_os_str()).to_string_lossy();
    println!("\nAnalyzing: {name}");
    println!("   (this may take a few seconds...)");

    let analysis = analyze_frame(file, analyzer, bad_pixel_map)?;
    let report = ImageReport::from_analysis(&analysis);

    let writer = ReportWriter::new(output_dir)?;
    let mut files = write_frame_outputs(&writer, &report, &analysis)?;
    if let Some(log_file) = log_file {
        files.push(log_file.to_path_buf());
    }

    console::print_image_summary(&report, &files);
    Ok(true)
}

fn analyze_directory(
    dir: &Path,
    analyzer: &SensorAnalyzer,
    output_dir: &Path,
    options: &BatchOptions,
) -> Result<bool> {
    let paths = scan_directory(dir)?;
    if paths.is_empty() {
        println!("\nNo supported frames found in {}", dir.display());
        return Ok(false);
    }
    println!("\nAnalyzing {} frame(s) in {}", paths.len(), dir.display());

    let outcome = analyze_batch(&paths, analyzer, options, |done, total| {
        log::info!("[{done}/{total}] frames processed");
    });

    let batch = BatchReport::from_outcome(&outcome);
    let writer = ReportWriter::new(output_dir)?;

    // Both iterate the successful frames in input order
    for (analysis, report) in outcome.succeeded().zip(&batch.reports) {
        write_frame_outputs(&writer, report, analysis)
            .with_context(|| format!("Failed to write reports for {}", report.file))?;
    }

    let written = if batch.analyzed_count() > 0 {
        Some(writer.write_batch_report(&batch)?)
    } else {
        None
    };

    console::print_batch_summary(&batch, written.as_ref());

    if outcome.aborted {
        log::error!("Batch aborted after the first failure");
        return Ok(false);
    }
    if batch.analyzed_count() == 0 {
        log::error!("No frame in {} could be analyzed", dir.display());
        return Ok(false);
    }
    Ok(true)
}

/// Write the per-frame reports, plus the bad pixel map when masks were kept
fn write_frame_outputs(writer: &ReportWriter, report: &ImageReport, analysis: &FrameAnalysis) -> Result<Vec<PathBuf>> {
    let mut files = writer.write_image_report(report)?.paths();
    if let Some(masks) = &analysis.masks {
        let map = BadPixelMap::from_masks(&analysis.info, masks);
        log::info!("Bad pixel map for {}: {} pixel(s)", analysis.info.file_name, map.num_bad_pixels());
        files.push(writer.write_bad_pixel_map(&map, &analysis.info.stem())?);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn write_dark_png(dir: &Path, name: &str) {
        let img = GrayImage::from_fn(32, 32, |x, y| Luma([10 + ((x + 3 * y) % 5) as u8]));
        img.save(dir.join(name)).unwrap();
    }

    fn batch(dir: &Path, output: &Path, fail_fast: bool) -> bool {
        let options = BatchOptions {
            jobs: Some(1),
            fail_fast,
            keep_masks: false,
        };
        analyze_directory(dir, &SensorAnalyzer::default(), output, &options).unwrap()
    }

    #[test]
    fn test_clean_batch_succeeds() {
        let frames = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_dark_png(frames.path(), "a.png");
        write_dark_png(frames.path(), "b.png");

        assert!(batch(frames.path(), output.path(), true));
        let written = std::fs::read_dir(output.path()).unwrap().count();
        // result, diagnostic and summary per frame plus the batch JSON and CSV
        assert_eq!(written, 3 * 2 + 2);
    }

    #[test]
    fn test_failure_on_last_frame_fails_a_fail_fast_batch() {
        let frames = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_dark_png(frames.path(), "a.png");
        std::fs::write(frames.path().join("z.png"), b"broken").unwrap();

        assert!(!batch(frames.path(), output.path(), true));
        // Without fail-fast the broken frame is only skipped
        assert!(batch(frames.path(), output.path(), false));
    }

    #[test]
    fn test_batch_without_frames_fails() {
        let frames = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(frames.path().join("notes.txt"), b"not a frame").unwrap();

        assert!(!batch(frames.path(), output.path(), false));

        std::fs::write(frames.path().join("only.png"), b"broken").unwrap();
        assert!(!batch(frames.path(), output.path(), false));
    }
}
