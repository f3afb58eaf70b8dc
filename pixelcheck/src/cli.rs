use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pixelcheck")]
#[command(version, about = "Hot and dead pixel analysis of camera dark frames")]
#[command(after_help = CAPTURE_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory for JSON, CSV and text reports
    #[arg(short, long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write the log to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

/// Analysis settings that override the config file
#[derive(Args, Debug, Default, Clone)]
pub struct TuningArgs {
    /// TOML file with analysis settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Do not warn when the frame does not look like a dark frame
    #[arg(long, global = true)]
    pub no_dark_check: bool,

    /// Sigma multiplier for hot and dead thresholds
    #[arg(long, global = true)]
    pub sigma: Option<f64>,

    /// IQR multiplier for hot and dead thresholds
    #[arg(long, global = true)]
    pub iqr_mult: Option<f64>,

    /// MAD multiplier for hot and dead thresholds
    #[arg(long, global = true)]
    pub mad_mult: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a single dark frame
    Analyze {
        /// Dark frame (TIFF, PNG, JPEG, BMP or camera raw)
        file: PathBuf,

        /// Also export the coordinates of defective pixels
        #[arg(long)]
        bad_pixel_map: bool,
    },

    /// Analyze every supported frame in a directory
    Batch {
        /// Directory containing dark frames
        dir: PathBuf,

        /// Worker threads (defaults to one per core)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Stop at the first frame that cannot be analyzed
        #[arg(long)]
        fail_fast: bool,

        /// Also export a bad pixel map per frame
        #[arg(long)]
        bad_pixel_map: bool,
    },
}

pub const CAPTURE_HELP: &str = "\
HOW TO CAPTURE A DARK FRAME:
  1. Manual mode (M), ISO 100-400
  2. Lens cap on the LENS (not the camera body)
  3. Exposure: 1-30 seconds
  4. Room temperature (20-25 C)
  5. Export as uncompressed 16-bit TIFF, or analyze the raw file directly";
