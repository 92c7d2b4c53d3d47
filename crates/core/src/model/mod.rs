//! Flat record types produced by an analysis run.
//!
//! A [`Finding`] is the terminal artifact of the engine: one observation per
//! function, immutable once built, serializable as-is into the JSON report.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Severity attached to a diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// SARIF result level for this severity (`info` maps to `note`).
    pub fn sarif_level(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "note",
        }
    }
}

/// What kind of observation a finding records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingKind {
    /// The function raised an exception not recognized as a deliberate guard.
    Crash,
    /// The worker exceeded its wall-clock budget.
    Timeout,
    /// The function rejected the input with a recognized validation message.
    GuardedInput,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::Crash => "Crash",
            FindingKind::Timeout => "Timeout",
            FindingKind::GuardedInput => "GuardedInput",
        }
    }
}

/// Arguments that reproduce a failing trial, rendered as Python literals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Repro {
    pub args: Vec<String>,
}

impl Repro {
    /// A call expression for the finding's function, e.g. `divide(0, 0)`.
    pub fn call_expr(&self, function: &str) -> String {
        format!("{}({})", function, self.args.join(", "))
    }
}

/// One reported crash/timeout/guard observation for one function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Absolute path of the analyzed file.
    pub file: PathBuf,
    /// Name of the function the finding belongs to.
    pub function: String,
    /// Parameter names in declaration order.
    pub param_names: Vec<String>,
    /// 1-based line the failure is attributed to.
    pub line: usize,
    /// 0-based start column of the attributed span.
    pub start_col: usize,
    /// 0-based end column (exclusive) of the attributed span.
    pub end_col: usize,
    pub kind: FindingKind,
    /// Stable diagnostic code id, e.g. `EC001`.
    pub code: String,
    pub title: String,
    pub severity: Severity,
    /// The failing message, `ExceptionName: text` for crashes.
    pub message: String,
    pub hint: String,
    pub repro: Repro,
    /// Raw worker stack trace, empty for timeouts.
    pub stack: String,
}
