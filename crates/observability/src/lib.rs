//! # Observability
//!
//! Tracing setup, a tracing-backed diagnostics sink and rig metrics.
//!
//! ## Features
//!
//! - Tracing initialization (JSON/Pretty/Compact)
//! - [`TracingDiagnostics`]: forwards sensor diagnostics to `tracing`
//! - Render-sharing metrics through the `metrics` facade, plus an in-memory
//!   [`RenderShareStats`] aggregator for summaries
//!
//! ## Usage
//!
//! ```ignore
//! observability::init()?;
//!
//! let plan = sensor::plan_render_passes(&rig.suite, allow_semantic_borrow);
//! observability::metrics::record_render_plan(plan.render_count(), plan.borrowed_count());
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use contracts::{Diagnostic, Diagnostics, Severity};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use crate::metrics::{
    record_diagnostic, record_render_plan, record_sensor_attached, RenderShareStats,
    RenderShareSummary, RunningStats, StatsSummary,
};

/// Initialize tracing with the default configuration
///
/// JSON output, honours `RUST_LOG`.
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// Used when `RUST_LOG` is unset
    pub default_log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            default_log_level: "info".to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// Structured JSON
    #[default]
    Json,
    /// Human readable, multi-line
    Pretty,
    /// Single line
    Compact,
}

/// Initialize with a custom configuration
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level));

    match config.log_format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer().pretty().with_writer(std::io::stderr);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer().compact().with_writer(std::io::stderr);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
    }

    tracing::debug!(log_format = ?config.log_format, "Observability initialized");
    Ok(())
}

/// Diagnostics sink that emits `tracing` events and counts them
///
/// Warnings become `warn!`, errors become `error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        let sensor = diagnostic.sensor.as_deref().unwrap_or("-");
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(sensor, "{}", diagnostic.message),
            Severity::Error => tracing::error!(sensor, "{}", diagnostic.message),
        }
        record_diagnostic(diagnostic.severity);
    }
}
