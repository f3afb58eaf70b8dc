use crate::cli::TuningArgs;
use anyhow::{Context, Result};
use sensor_analysis::AnalysisConfig;

/// Resolve the analysis configuration: defaults, then the config file, then flags
pub fn resolve_config(tuning: &TuningArgs) -> Result<AnalysisConfig> {
    let mut config = match &tuning.config {
        Some(path) => {
            log::info!("Loading analysis settings from {}", path.display());
            AnalysisConfig::from_toml_file(path)
                .with_context(|| format!("Invalid configuration file {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };

    if tuning.no_dark_check {
        config.require_dark_frame = false;
    }
    if let Some(sigma) = tuning.sigma {
        config.hot_pixel_sigma = sigma;
        config.dead_pixel_sigma = sigma;
    }
    if let Some(mult) = tuning.iqr_mult {
        config.hot_pixel_iqr_mult = mult;
        config.dead_pixel_iqr_mult = mult;
    }
    if let Some(mult) = tuning.mad_mult {
        config.hot_pixel_mad_mult = mult;
        config.dead_pixel_mad_mult = mult;
    }

    config.validate().context("Invalid analysis settings")?;
    Ok(config)
}
