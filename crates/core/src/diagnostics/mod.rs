//! Static diagnostic registry and exception classification.
//!
//! The registry is a process-wide, read-only table keyed by exception name,
//! with a secondary keying by guard-message substring. The guard matching is
//! deliberately an exact lowercase substring check against a fixed phrase
//! list; reclassifying a recognized guard as informational is what keeps a
//! function that *correctly* rejects bad input from being reported like one
//! that crashes on it.

use crate::model::{FindingKind, Severity};

/// Immutable registry entry for one diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticCode {
    pub id: &'static str,
    pub title: &'static str,
    pub default_severity: Severity,
    pub hint: &'static str,
}

/// Possible division by zero.
pub const EC001: DiagnosticCode = DiagnosticCode {
    id: "EC001",
    title: "Possible division by zero",
    default_severity: Severity::Error,
    hint: "Check denominator or early-return.",
};

/// Index may be out of range.
pub const EC002: DiagnosticCode = DiagnosticCode {
    id: "EC002",
    title: "Index may be out of range",
    default_severity: Severity::Error,
    hint: "Validate buffer length/index.",
};

/// Worker exceeded its wall-clock budget.
pub const EC003: DiagnosticCode = DiagnosticCode {
    id: "EC003",
    title: "Execution exceeded time budget",
    default_severity: Severity::Warning,
    hint: "Check for unbounded loops or blocking calls on edge inputs.",
};

/// ValueError with no recognized guard message.
pub const EC090: DiagnosticCode = DiagnosticCode {
    id: "EC090",
    title: "ValueError",
    default_severity: Severity::Warning,
    hint: "Review arguments and add guards.",
};

/// Intentional guard: zero denominator.
pub const EC101: DiagnosticCode = DiagnosticCode {
    id: "EC101",
    title: "Guarded invalid input (zero denominator)",
    default_severity: Severity::Info,
    hint: "This ValueError is an intentional guard. Consider documenting or returning a Result type.",
};

/// Intentional guard: undersized buffer.
pub const EC102: DiagnosticCode = DiagnosticCode {
    id: "EC102",
    title: "Guarded invalid input (buffer size)",
    default_severity: Severity::Info,
    hint: "This ValueError is an intentional guard. Consider documenting or validating earlier.",
};

/// Anything outside the registry.
pub const EC999: DiagnosticCode = DiagnosticCode {
    id: "EC999",
    title: "Unclassified runtime failure",
    default_severity: Severity::Error,
    hint: "Review function arguments and add guards.",
};

/// Every registry entry, in id order. Used by frontends to list rules.
pub fn registry() -> &'static [DiagnosticCode] {
    &[EC001, EC002, EC003, EC090, EC101, EC102, EC999]
}

/// Guard phrases recognized in `ValueError` messages (lowercase substrings).
const GUARD_PHRASES: &[(&str, &DiagnosticCode)] = &[
    ("denominator cannot be zero", &EC101),
    ("buffer too small for index", &EC102),
];

/// Result of classifying one raw failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub code: DiagnosticCode,
    pub kind: FindingKind,
}

/// Classify an exception reported by a worker.
///
/// Lookup order: exact exception name; for `ValueError`, guard-message
/// substrings (reclassifying to [`FindingKind::GuardedInput`]); unmatched
/// `ValueError` → [`EC090`]; everything else → [`EC999`].
pub fn classify(exception: &str, message: &str) -> Classification {
    // Tolerate dotted spellings like `builtins.ZeroDivisionError`.
    let name = exception.rsplit('.').next().unwrap_or(exception);
    match name {
        "ZeroDivisionError" => Classification { code: EC001, kind: FindingKind::Crash },
        "IndexError" => Classification { code: EC002, kind: FindingKind::Crash },
        "ValueError" => {
            let lowered = message.to_lowercase();
            for (phrase, code) in GUARD_PHRASES {
                if lowered.contains(phrase) {
                    return Classification { code: **code, kind: FindingKind::GuardedInput };
                }
            }
            Classification { code: EC090, kind: FindingKind::Crash }
        }
        _ => Classification { code: EC999, kind: FindingKind::Crash },
    }
}

/// Classification for a trial that exceeded its budget.
///
/// Always [`EC003`]/warning, regardless of any message content.
pub fn classify_timeout() -> Classification {
    Classification { code: EC003, kind: FindingKind::Timeout }
}
