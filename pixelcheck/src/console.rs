//! Plain console output for the user; logging goes through `log`

use sensor_report::{group_thousands, BatchReport, ImageReport, WrittenBatch};
use std::path::PathBuf;

const RULE: &str = "============================================================";
const THIN_RULE: &str = "--------------------------------------------------";

pub fn print_image_summary(report: &ImageReport, written: &[PathBuf]) {
    let r = &report.result;

    println!("\nMAIN RESULTS:");
    println!("{THIN_RULE}");
    println!("File:         {}", report.file);
    println!("Resolution:   {} ({})", r.resolution(), r.bit_depth);
    println!("Total pixels: {}", group_thousands(r.total_pixels));
    println!();
    println!("Hot pixels:   {} ({:.4}%)", group_thousands(r.hot_pixels), r.hot_percentage);
    println!("Dead pixels:  {} ({:.4}%)", group_thousands(r.dead_pixels), r.dead_percentage);
    println!();
    println!("Grade:        {}", r.grade.label());
    println!("              {}", r.recommendation);
    println!();
    println!("SNR:          {:.2} dB", r.snr_db);
    println!("Mean:         {:.4}", r.stats.mean);

    if !report.diagnostics.is_empty() {
        println!("\nDIAGNOSTICS:");
        println!("{THIN_RULE}");
        for diagnostic in &report.diagnostics {
            for line in diagnostic.lines() {
                println!("{line}");
            }
        }
    }

    if !written.is_empty() {
        println!("\n{RULE}");
        println!("FILES WRITTEN:");
        for path in written {
            println!("   {}", path.display());
        }
        println!("{RULE}");
    }

    if r.grade.is_deficient() {
        println!("\nWARNING: sensor graded DEFICIENT");
        println!("   Consider a professional inspection of the camera\n");
    }
}

pub fn print_batch_summary(batch: &BatchReport, written: Option<&WrittenBatch>) {
    println!("\nBATCH RESULTS:");
    println!("{THIN_RULE}");
    println!(
        "Analyzed {} of {} frame(s)",
        batch.analyzed_count(),
        batch.total_files
    );

    for report in &batch.reports {
        let r = &report.result;
        println!(
            "  {:<32} {:<3} hot {:>8} dead {:>8} SNR {:>7.2} dB",
            report.file,
            r.grade.to_string(),
            group_thousands(r.hot_pixels),
            group_thousands(r.dead_pixels),
            r.snr_db
        );
    }

    if !batch.grade_counts.is_empty() {
        let counts: Vec<String> = batch
            .grade_counts
            .iter()
            .map(|(grade, count)| format!("{grade}: {count}"))
            .collect();
        println!("Grades: {}", counts.join(", "));
    }

    if !batch.failures.is_empty() {
        println!("\nFAILED:");
        for failure in &batch.failures {
            println!("  {}", failure.error);
        }
    }

    if let Some(written) = written {
        println!("\n{RULE}");
        println!("FILES WRITTEN:");
        println!("   {}", written.json.display());
        println!("   {}", written.csv.display());
        println!("{RULE}");
    }

    let deficient = batch.deficient().count();
    if deficient > 0 {
        println!("\nWARNING: {deficient} sensor frame(s) graded DEFICIENT\n");
    }
}
