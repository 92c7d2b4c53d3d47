use edgecheck_core::syntax::{
    has_ignore_pragma, match_span, RiskKind, SourceIndex, WIDE_SPAN,
};

const SAMPLE: &str = "\
def divide(a: int, b: int):
    return a / b


def pick(data: bytes, idx: int = 0):
    return data[idx]
";

#[test]
fn top_level_functions_are_indexed_with_lines_and_params() {
    let index = SourceIndex::parse(SAMPLE);
    assert_eq!(index.len(), 2);

    let divide = index.function("divide").expect("divide indexed");
    assert_eq!(divide.line, 1);
    let names: Vec<&str> = divide.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(divide.params[0].annotation.as_deref(), Some("int"));

    let pick = index.function("pick").expect("pick indexed");
    assert_eq!(pick.line, 5);
    assert_eq!(pick.params[0].annotation.as_deref(), Some("bytes"));
    // Annotation survives alongside a default value.
    assert_eq!(pick.params[1].annotation.as_deref(), Some("int"));
}

#[test]
fn division_and_subscript_spans_are_collected() {
    let index = SourceIndex::parse(SAMPLE);

    let divide = index.function("divide").unwrap();
    assert_eq!(divide.risky_spans.len(), 1);
    let span = divide.risky_spans[0];
    assert_eq!(span.kind, RiskKind::Division);
    assert_eq!((span.line, span.start_col, span.end_col), (2, 11, 16));

    let pick = index.function("pick").unwrap();
    assert_eq!(pick.risky_spans.len(), 1);
    let span = pick.risky_spans[0];
    assert_eq!(span.kind, RiskKind::Subscript);
    assert_eq!((span.line, span.start_col, span.end_col), (6, 11, 20));
}

#[test]
fn span_matching_prefers_the_kind_of_the_exception() {
    let source = "\
def mix(a: int, items: list):
    return items[0] / a
";
    let index = SourceIndex::parse(source);
    let spans = &index.function("mix").unwrap().risky_spans;

    // Both a division and a subscript live on line 2.
    assert_eq!(match_span(spans, 2, "ZeroDivisionError"), (11, 23));
    assert_eq!(match_span(spans, 2, "IndexError"), (11, 19));
}

#[test]
fn span_matching_breaks_ties_on_smallest_start_column() {
    let source = "\
def pair(x: list, y: list):
    return x[0] + y[1]
";
    let index = SourceIndex::parse(source);
    let spans = &index.function("pair").unwrap().risky_spans;
    let (start, _end) = match_span(spans, 2, "IndexError");
    assert_eq!(start, 11);
}

#[test]
fn span_matching_degrades_to_the_wide_span() {
    let index = SourceIndex::parse(SAMPLE);
    let spans = &index.function("divide").unwrap().risky_spans;
    assert_eq!(match_span(spans, 1, "TypeError"), WIDE_SPAN);
    assert_eq!(match_span(&[], 7, "ZeroDivisionError"), WIDE_SPAN);
}

#[test]
fn decorated_functions_use_the_def_line() {
    let source = "\
@trace
def wrapped(x: str):
    return x
";
    let index = SourceIndex::parse(source);
    let wrapped = index.function("wrapped").expect("decorated def indexed");
    assert_eq!(wrapped.line, 2);
    assert_eq!(wrapped.params[0].annotation.as_deref(), Some("str"));
}

#[test]
fn unannotated_and_splat_params_have_no_annotation() {
    let source = "\
def plain(x, *args, **kwargs):
    return x
";
    let index = SourceIndex::parse(source);
    let plain = index.function("plain").unwrap();
    let names: Vec<&str> = plain.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["x", "args", "kwargs"]);
    assert!(plain.params.iter().all(|p| p.annotation.is_none()));
}

#[test]
fn multi_line_spans_degrade_to_single_column_width() {
    let source = "\
def f(d):
    return d[
        0]
";
    let index = SourceIndex::parse(source);
    let spans = &index.function("f").unwrap().risky_spans;
    assert_eq!(spans.len(), 1);
    assert_eq!((spans[0].line, spans[0].start_col, spans[0].end_col), (2, 11, 12));
}

#[test]
fn ignore_pragma_is_only_honored_in_the_first_lines() {
    assert!(has_ignore_pragma("# edgecheck: ignore-file\nx = 1\n"));
    assert!(has_ignore_pragma("x = 1\n  # EDGECHECK: IGNORE-FILE\n"));
    assert!(!has_ignore_pragma("a\nb\nc\nd\ne\n# edgecheck: ignore-file\n"));
    assert!(!has_ignore_pragma("print('# edgecheck: ignore-file')\n"));
}
