//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sensor Rig - load, inspect and convert sensor rig configurations
#[derive(Parser, Debug)]
#[command(
    name = "sensor-rig",
    author,
    version,
    about = "Sensor rig configuration tool",
    long_about = "Loads sensor rig configurations (TOML, JSON or cfg), validates them, \n\
                  places the sensors on an in-memory scene graph and reports which \n\
                  sensors can share a render pass."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SENSOR_RIG_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "SENSOR_RIG_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a rig configuration
    Validate(ValidateArgs),

    /// Spawn the rig in memory and display sensors and render passes
    Info(InfoArgs),

    /// Convert a rig configuration to another format
    Export(ExportArgs),
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file (TOML, JSON or cfg)
    #[arg(short, long, default_value = "rig.toml", env = "SENSOR_RIG_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "rig.toml", env = "SENSOR_RIG_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show per-sensor details
    #[arg(long)]
    pub sensors: bool,

    /// Show the render-pass plan
    #[arg(long)]
    pub plan: bool,

    /// Let semantic sensors share render passes, overriding the configuration
    #[arg(long, env = "SENSOR_RIG_ALLOW_SEMANTIC_BORROW")]
    pub allow_semantic_borrow: bool,
}

/// Arguments for the `export` command
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Input configuration file
    #[arg(short, long, env = "SENSOR_RIG_CONFIG")]
    pub config: PathBuf,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,
}

/// Output format of `export`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Toml,
    Json,
    Cfg,
}

impl From<ExportFormat> for config_loader::ConfigFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Toml => Self::Toml,
            ExportFormat::Json => Self::Json,
            ExportFormat::Cfg => Self::Cfg,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_args() {
        let cli = Cli::try_parse_from([
            "sensor-rig",
            "export",
            "-c",
            "rig.toml",
            "-o",
            "rig.cfg",
            "--format",
            "cfg",
        ])
        .unwrap();
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.format, Some(ExportFormat::Cfg));
                assert_eq!(args.output, Some(PathBuf::from("rig.cfg")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["sensor-rig", "-q", "-v", "validate"]).is_err());
    }
}
