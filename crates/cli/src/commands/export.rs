//! `export` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use config_loader::{ConfigFormat, ConfigLoader};
use tracing::info;

use crate::cli::ExportArgs;
use crate::error::CliError;

/// Execute the `export` command
pub fn run_export(args: &ExportArgs) -> Result<()> {
    if !args.config.exists() {
        return Err(CliError::config_not_found(&args.config).into());
    }

    let format = target_format(args)?;
    let blueprint = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let content = ConfigLoader::to_format(&blueprint, format).map_err(CliError::from)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &content).map_err(CliError::from)?;
            info!(
                from = %args.config.display(),
                to = %path.display(),
                format = format.extension(),
                sensors = blueprint.sensor_count(),
                "exported configuration"
            );
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn target_format(args: &ExportArgs) -> Result<ConfigFormat, CliError> {
    if let Some(format) = args.format {
        return Ok(format.into());
    }
    match &args.output {
        Some(path) => format_of(path),
        None => Err(CliError::unknown_export_format("stdout")),
    }
}

fn format_of(path: &Path) -> Result<ConfigFormat, CliError> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(ConfigFormat::from_extension)
        .ok_or_else(|| CliError::unknown_export_format(path.display().to_string()))
}
