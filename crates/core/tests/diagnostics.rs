use std::collections::HashSet;

use edgecheck_core::diagnostics::{classify, classify_timeout, registry};
use edgecheck_core::model::{FindingKind, Severity};

#[test]
fn division_by_zero_is_an_error_crash() {
    let c = classify("ZeroDivisionError", "division by zero");
    assert_eq!(c.code.id, "EC001");
    assert_eq!(c.code.default_severity, Severity::Error);
    assert_eq!(c.kind, FindingKind::Crash);
}

#[test]
fn index_error_is_an_error_crash() {
    let c = classify("IndexError", "index out of range");
    assert_eq!(c.code.id, "EC002");
    assert_eq!(c.kind, FindingKind::Crash);
}

#[test]
fn dotted_exception_names_still_match() {
    let c = classify("builtins.ZeroDivisionError", "division by zero");
    assert_eq!(c.code.id, "EC001");
}

#[test]
fn recognized_guard_messages_reclassify_to_info() {
    let c = classify("ValueError", "Denominator CANNOT be zero");
    assert_eq!(c.code.id, "EC101");
    assert_eq!(c.code.default_severity, Severity::Info);
    assert_eq!(c.kind, FindingKind::GuardedInput);

    let c = classify("ValueError", "buffer too small for index 100");
    assert_eq!(c.code.id, "EC102");
    assert_eq!(c.kind, FindingKind::GuardedInput);
}

#[test]
fn unrecognized_value_error_is_a_warning() {
    let c = classify("ValueError", "something else entirely");
    assert_eq!(c.code.id, "EC090");
    assert_eq!(c.code.default_severity, Severity::Warning);
    assert_eq!(c.kind, FindingKind::Crash);
}

#[test]
fn unmapped_exceptions_get_the_unknown_code() {
    let c = classify("RuntimeError", "boom");
    assert_eq!(c.code.id, "EC999");
    assert_eq!(c.code.default_severity, Severity::Error);
    assert_eq!(c.kind, FindingKind::Crash);
}

#[test]
fn timeouts_are_always_warnings() {
    let c = classify_timeout();
    assert_eq!(c.code.id, "EC003");
    assert_eq!(c.code.default_severity, Severity::Warning);
    assert_eq!(c.kind, FindingKind::Timeout);
}

#[test]
fn registry_ids_are_unique() {
    let codes = registry();
    assert!(!codes.is_empty());
    let ids: HashSet<&str> = codes.iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), codes.len());
}
