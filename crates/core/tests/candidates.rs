use edgecheck_core::candidates::{
    candidates_for_param, fallback_values, values_for, TypeKind, Value, MAX_CANDIDATES_PER_PARAM,
};

#[test]
fn every_recognized_kind_yields_values() {
    let kinds = [
        TypeKind::Int,
        TypeKind::Float,
        TypeKind::Bool,
        TypeKind::Str,
        TypeKind::Bytes,
        TypeKind::List,
        TypeKind::Tuple,
        TypeKind::Dict,
        TypeKind::Set,
        TypeKind::Optional(vec![TypeKind::Int]),
        TypeKind::Unknown,
    ];
    for kind in kinds {
        assert!(!values_for(&kind).is_empty(), "no values for {kind:?}");
    }
}

#[test]
fn unknown_annotation_routes_to_fallback() {
    assert_eq!(values_for(&TypeKind::Unknown), fallback_values());
    assert_eq!(TypeKind::parse("Frobnicator"), TypeKind::Unknown);
    assert_eq!(TypeKind::parse(""), TypeKind::Unknown);
}

#[test]
fn missing_annotation_uses_truncated_fallback() {
    let values = candidates_for_param(None);
    assert_eq!(values.len(), MAX_CANDIDATES_PER_PARAM);
    assert_eq!(values[..], fallback_values()[..MAX_CANDIDATES_PER_PARAM]);
}

#[test]
fn int_candidates_cover_extremes() {
    let values = values_for(&TypeKind::Int);
    assert_eq!(
        values,
        vec![
            Value::Int(0),
            Value::Int(1),
            Value::Int(-1),
            Value::Int(i64::MAX),
            Value::Int(i64::MIN),
        ]
    );
}

#[test]
fn float_candidates_cover_non_finite_values() {
    let literals: Vec<String> =
        values_for(&TypeKind::Float).iter().map(Value::python_literal).collect();
    assert!(literals.contains(&"float('nan')".to_string()));
    assert!(literals.contains(&"float('inf')".to_string()));
    assert!(literals.contains(&"float('-inf')".to_string()));
    assert!(literals.contains(&"-0.0".to_string()));
}

#[test]
fn candidates_are_capped_for_planning() {
    assert!(candidates_for_param(Some("float")).len() <= MAX_CANDIDATES_PER_PARAM);
    assert!(candidates_for_param(Some("no such type")).len() <= MAX_CANDIDATES_PER_PARAM);
}

#[test]
fn optional_starts_with_none_then_inner_values() {
    let values = values_for(&TypeKind::Optional(vec![TypeKind::Int]));
    assert_eq!(values[0], Value::None);
    assert_eq!(values[1], Value::Int(0));
    assert_eq!(values[2], Value::Int(1));
}

#[test]
fn optional_deduplicates_members() {
    let values = values_for(&TypeKind::Optional(vec![TypeKind::Int, TypeKind::Int]));
    let literals: Vec<String> = values.iter().map(Value::python_literal).collect();
    let mut unique = literals.clone();
    unique.dedup();
    assert_eq!(literals, unique);
}

#[test]
fn annotation_parsing_recognizes_common_spellings() {
    assert_eq!(TypeKind::parse("int"), TypeKind::Int);
    assert_eq!(TypeKind::parse("bytes"), TypeKind::Bytes);
    assert_eq!(TypeKind::parse("List[int]"), TypeKind::List);
    assert_eq!(TypeKind::parse("typing.Dict[str, int]"), TypeKind::Dict);
    assert_eq!(TypeKind::parse("'int'"), TypeKind::Int);
    assert_eq!(
        TypeKind::parse("Optional[int]"),
        TypeKind::Optional(vec![TypeKind::Int])
    );
    assert_eq!(
        TypeKind::parse("typing.Union[str, None]"),
        TypeKind::Optional(vec![TypeKind::Str])
    );
    assert_eq!(
        TypeKind::parse("int | None"),
        TypeKind::Optional(vec![TypeKind::Int])
    );
    // Unions without None stay unknown rather than guessing a member.
    assert_eq!(TypeKind::parse("Union[int, str]"), TypeKind::Unknown);
}

#[test]
fn python_literals_render_like_python() {
    assert_eq!(Value::None.python_literal(), "None");
    assert_eq!(Value::Bool(true).python_literal(), "True");
    assert_eq!(Value::Float(0.0).python_literal(), "0.0");
    assert_eq!(Value::Str("a'b".to_string()).python_literal(), "'a\\'b'");
    assert_eq!(Value::Bytes(vec![0, b'A']).python_literal(), "b'\\x00A'");
    assert_eq!(Value::Tuple(vec![Value::Int(0)]).python_literal(), "(0,)");
    assert_eq!(Value::Set(vec![]).python_literal(), "set()");
    assert_eq!(
        Value::Dict(vec![(Value::Str("k".to_string()), Value::Int(0))]).python_literal(),
        "{'k': 0}"
    );
    assert_eq!(
        Value::List(vec![Value::Int(0), Value::Int(1)]).python_literal(),
        "[0, 1]"
    );
}

#[test]
fn wire_form_keeps_non_finite_floats_as_strings() {
    let wire = Value::Float(f64::NAN).to_wire();
    assert_eq!(wire["t"], "float");
    assert_eq!(wire["v"], "nan");

    let wire = Value::Bytes(vec![0, 255]).to_wire();
    assert_eq!(wire["t"], "bytes");
    assert_eq!(wire["hex"], "00ff");
}
