//! Rig metrics
//!
//! Counters and gauges go through the `metrics` facade; without an installed
//! recorder they are no-ops. [`RenderShareStats`] keeps the same numbers in
//! memory for summaries.

use std::collections::BTreeMap;

use contracts::{SensorType, Severity};
use metrics::{counter, gauge, histogram};

/// Record a sensor bound to a node
pub fn record_sensor_attached(sensor_type: SensorType) {
    counter!(
        "sensor_rig_sensors_attached_total",
        "sensor_type" => sensor_type.as_str()
    )
    .increment(1);
}

/// Record a reported diagnostic
pub fn record_diagnostic(severity: Severity) {
    let severity = match severity {
        Severity::Warning => "warning",
        Severity::Error => "error",
    };
    counter!("sensor_rig_diagnostics_total", "severity" => severity).increment(1);
}

/// Record the outcome of render-pass planning
pub fn record_render_plan(render_passes: usize, borrowed: usize) {
    gauge!("sensor_rig_render_passes").set(render_passes as f64);
    gauge!("sensor_rig_borrowed_renders").set(borrowed as f64);
    counter!("sensor_rig_borrowed_renders_total").increment(borrowed as u64);

    let total = render_passes + borrowed;
    if total > 0 {
        histogram!("sensor_rig_render_share_ratio").record(borrowed as f64 / total as f64);
    }
}

/// Render-sharing aggregator
#[derive(Debug, Clone, Default)]
pub struct RenderShareStats {
    pub render_passes: u64,
    pub borrowed: u64,
    pub unplaced: u64,

    /// Sensors per pass, source included
    pub pass_size: RunningStats,

    /// Passes by the type of their source sensor
    pub passes_by_type: BTreeMap<SensorType, u64>,
}

impl RenderShareStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one render pass
    pub fn record_pass(&mut self, source_type: SensorType, borrowers: usize) {
        self.render_passes += 1;
        self.borrowed += borrowers as u64;
        self.pass_size.push((borrowers + 1) as f64);
        *self.passes_by_type.entry(source_type).or_insert(0) += 1;
    }

    /// Account for a sensor that could not be planned
    pub fn record_unplaced(&mut self) {
        self.unplaced += 1;
    }

    pub fn summary(&self) -> RenderShareSummary {
        let sensors = self.render_passes + self.borrowed;
        RenderShareSummary {
            sensors,
            render_passes: self.render_passes,
            borrowed: self.borrowed,
            unplaced: self.unplaced,
            saved_rate: if sensors > 0 {
                self.borrowed as f64 / sensors as f64 * 100.0
            } else {
                0.0
            },
            pass_size: StatsSummary::from(&self.pass_size),
            passes_by_type: self.passes_by_type.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderShareSummary {
    pub sensors: u64,
    pub render_passes: u64,
    pub borrowed: u64,
    pub unplaced: u64,
    /// Share of sensors that need no render of their own, in percent
    pub saved_rate: f64,
    pub pass_size: StatsSummary,
    pub passes_by_type: BTreeMap<SensorType, u64>,
}

impl std::fmt::Display for RenderShareSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Render Sharing Summary ===")?;
        writeln!(f, "Planned sensors: {}", self.sensors)?;
        writeln!(f, "Render passes: {}", self.render_passes)?;
        writeln!(
            f,
            "Borrowed renders: {} ({:.2}%)",
            self.borrowed, self.saved_rate
        )?;
        if self.unplaced > 0 {
            writeln!(f, "Sensors without spec: {}", self.unplaced)?;
        }
        writeln!(f, "Sensors per pass: {}", self.pass_size)?;

        if !self.passes_by_type.is_empty() {
            writeln!(f, "Passes by source type:")?;
            for (sensor_type, count) in &self.passes_by_type {
                writeln!(f, "  {}: {}", sensor_type, count)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
