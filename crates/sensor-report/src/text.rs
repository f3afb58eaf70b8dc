use crate::group_thousands;
use crate::report::ImageReport;
use std::fmt::Write;
use std::path::PathBuf;

const RULE: &str = "============================================================";
const SECTION_RULE: &str = "----------------------------------------";

/// Render the human-readable diagnostic report for one frame.
///
/// `written` lists the files produced alongside this report.
pub fn render_report(report: &ImageReport, written: &[PathBuf]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, report, written);
    out
}

fn write_report(out: &mut String, report: &ImageReport, written: &[PathBuf]) -> std::fmt::Result {
    let r = &report.result;
    writeln!(out, "{RULE}")?;
    writeln!(out, "PIXELCHECK - SENSOR DIAGNOSTIC REPORT")?;
    writeln!(out, "{RULE}\n")?;

    writeln!(out, "File:         {}", report.file)?;
    writeln!(out, "Resolution:   {} ({})", r.resolution(), r.bit_depth)?;
    writeln!(out, "Format:       {} ({} sensor)", report.frame.format, report.frame.sensor)?;
    writeln!(out, "Total pixels: {}\n", group_thousands(r.total_pixels))?;

    writeln!(out, "DEFECTS DETECTED:")?;
    writeln!(out, "{SECTION_RULE}")?;
    writeln!(
        out,
        "Hot pixels:    {} ({:.4}%)",
        group_thousands(r.hot_pixels),
        r.hot_percentage
    )?;
    writeln!(
        out,
        "Dead pixels:   {} ({:.4}%)",
        group_thousands(r.dead_pixels),
        r.dead_percentage
    )?;
    writeln!(
        out,
        "Total defects: {} ({:.4}%)\n",
        group_thousands(r.total_defects()),
        r.total_defect_percentage()
    )?;

    writeln!(out, "CLASSIFICATION:")?;
    writeln!(out, "{SECTION_RULE}")?;
    writeln!(out, "Grade:          {}", r.grade.label())?;
    writeln!(out, "Recommendation: {}\n", r.recommendation)?;

    writeln!(out, "QUALITY METRICS:")?;
    writeln!(out, "{SECTION_RULE}")?;
    writeln!(out, "SNR:       {:.2} dB", r.snr_db)?;
    writeln!(out, "Mean:      {:.4}", r.stats.mean)?;
    writeln!(out, "Std dev:   {:.4}", r.stats.std)?;
    writeln!(out, "Median:    {:.4}", r.stats.median)?;
    writeln!(out, "Mode:      {:.4}", r.stats.mode)?;
    writeln!(
        out,
        "Dark frame: {}\n",
        if r.dark_frame.is_valid { "valid" } else { "NOT valid" }
    )?;

    if !report.diagnostics.is_empty() {
        writeln!(out, "DIAGNOSTICS:")?;
        writeln!(out, "{SECTION_RULE}")?;
        for diagnostic in &report.diagnostics {
            for line in diagnostic.lines() {
                writeln!(out, "{line}")?;
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "TECHNICAL INFORMATION:")?;
    writeln!(out, "{SECTION_RULE}")?;
    writeln!(out, "Analyzed at:    {}", report.analyzed_at.to_rfc3339())?;
    writeln!(
        out,
        "Sigma rule:     {} sigma (hot) / {} sigma (dead)",
        r.config.hot_pixel_sigma, r.config.dead_pixel_sigma
    )?;
    writeln!(
        out,
        "IQR rule:       {} x IQR (hot) / {} x IQR (dead)",
        r.config.hot_pixel_iqr_mult, r.config.dead_pixel_iqr_mult
    )?;
    writeln!(
        out,
        "MAD rule:       {} x MAD (hot) / {} x MAD (dead)",
        r.config.hot_pixel_mad_mult, r.config.dead_pixel_mad_mult
    )?;

    if !written.is_empty() {
        writeln!(out, "\n{RULE}")?;
        writeln!(out, "FILES WRITTEN:")?;
        for path in written {
            writeln!(out, "- {}", path.display())?;
        }
    }
    writeln!(out, "{RULE}")
}
