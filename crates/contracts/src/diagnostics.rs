//! Diagnostics sink
//!
//! Core types report recoverable conditions through an injected sink instead
//! of logging globally, so tests can assert on what was reported.

use std::sync::{Mutex, PoisonError};

use crate::SensorId;

/// Severity of a reported condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// A reported condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Sensor the condition concerns, if known
    pub sensor: Option<SensorId>,

    pub message: String,
}

impl Diagnostic {
    pub fn warning(sensor: Option<SensorId>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            sensor,
            message: message.into(),
        }
    }

    pub fn error(sensor: Option<SensorId>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            sensor,
            message: message.into(),
        }
    }
}

/// Receiver of diagnostics
pub trait Diagnostics: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink that keeps everything it receives
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected diagnostics
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn report(&self, _diagnostic: Diagnostic) {}
}
