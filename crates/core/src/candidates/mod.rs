//! Type-driven candidate value generation.
//!
//! Each parameter of a target function gets a small ordered list of edge
//! representatives based on its annotation. Unknown or missing annotations
//! fall back to a fixed mixed-type list; generation itself never fails.

use serde_json::json;

/// Hard cap applied to every per-parameter candidate list before planning.
pub const MAX_CANDIDATES_PER_PARAM: usize = 5;

/// A Python value the engine can synthesize and ship to a worker.
///
/// Closed by design: the wire protocol and the literal renderer must agree on
/// every representable shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Set(Vec<Value>),
}

impl Value {
    /// Tagged wire form decoded by the worker runner.
    ///
    /// Floats travel as strings so that NaN and the infinities survive JSON;
    /// bytes travel as hex.
    pub fn to_wire(&self) -> serde_json::Value {
        match self {
            Value::None => json!({ "t": "none" }),
            Value::Bool(b) => json!({ "t": "bool", "v": b }),
            Value::Int(i) => json!({ "t": "int", "v": i }),
            Value::Float(f) => json!({ "t": "float", "v": format_float(*f) }),
            Value::Str(s) => json!({ "t": "str", "v": s }),
            Value::Bytes(b) => json!({ "t": "bytes", "hex": hex_encode(b) }),
            Value::List(items) => {
                json!({ "t": "list", "items": wire_items(items) })
            }
            Value::Tuple(items) => {
                json!({ "t": "tuple", "items": wire_items(items) })
            }
            Value::Set(items) => {
                json!({ "t": "set", "items": wire_items(items) })
            }
            Value::Dict(entries) => {
                let items: Vec<serde_json::Value> =
                    entries.iter().map(|(k, v)| json!([k.to_wire(), v.to_wire()])).collect();
                json!({ "t": "dict", "items": items })
            }
        }
    }

    /// Python source literal for this value, used in repro reporting.
    pub fn python_literal(&self) -> String {
        match self {
            Value::None => "None".to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => float_literal(*f),
            Value::Str(s) => str_literal(s),
            Value::Bytes(b) => bytes_literal(b),
            Value::List(items) => format!("[{}]", join_literals(items)),
            Value::Tuple(items) => match items.len() {
                0 => "()".to_string(),
                1 => format!("({},)", items[0].python_literal()),
                _ => format!("({})", join_literals(items)),
            },
            Value::Set(items) => {
                if items.is_empty() {
                    "set()".to_string()
                } else {
                    format!("{{{}}}", join_literals(items))
                }
            }
            Value::Dict(entries) => {
                let body: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.python_literal(), v.python_literal()))
                    .collect();
                format!("{{{}}}", body.join(", "))
            }
        }
    }
}

fn wire_items(items: &[Value]) -> Vec<serde_json::Value> {
    items.iter().map(Value::to_wire).collect()
}

fn join_literals(items: &[Value]) -> String {
    items.iter().map(Value::python_literal).collect::<Vec<_>>().join(", ")
}

/// Wire form of a float: always a string Python's `float()` accepts.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f == f64::INFINITY {
        "inf".to_string()
    } else if f == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{f:?}")
    }
}

fn float_literal(f: f64) -> String {
    if f.is_nan() {
        "float('nan')".to_string()
    } else if f == f64::INFINITY {
        "float('inf')".to_string()
    } else if f == f64::NEG_INFINITY {
        "float('-inf')".to_string()
    } else {
        format!("{f:?}")
    }
}

fn str_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn bytes_literal(bytes: &[u8]) -> String {
    let mut out = String::from("b'");
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out.push('\'');
    out
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Recognized annotation shapes, with an `Unknown` catch-all.
///
/// Anything the parser cannot place lands on `Unknown` and routes to the
/// global fallback list; parsing never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Int,
    Float,
    Bool,
    Str,
    Bytes,
    List,
    Tuple,
    Dict,
    Set,
    /// `Optional[T]` / `Union[..., None]`; holds the non-None member kinds.
    Optional(Vec<TypeKind>),
    Unknown,
}

impl TypeKind {
    /// Parse the source text of a type annotation.
    ///
    /// Handles builtin names, `typing.`-qualified spellings, subscripted
    /// containers, quoted forward references, and `Optional`/`Union`-with-None.
    pub fn parse(annotation: &str) -> TypeKind {
        let text = annotation.trim().trim_matches(|c| c == '"' || c == '\'');
        if text.is_empty() {
            return TypeKind::Unknown;
        }

        let (head, args) = split_subscript(text);
        // `typing.Optional` and `t.Optional` both key on the last segment.
        let base = head.rsplit('.').next().unwrap_or(head).trim();

        match base {
            "int" => TypeKind::Int,
            "float" => TypeKind::Float,
            "bool" => TypeKind::Bool,
            "str" => TypeKind::Str,
            "bytes" => TypeKind::Bytes,
            "list" | "List" | "Sequence" => TypeKind::List,
            "tuple" | "Tuple" => TypeKind::Tuple,
            "dict" | "Dict" => TypeKind::Dict,
            "set" | "Set" => TypeKind::Set,
            "Optional" => {
                let inner = parse_members(args);
                TypeKind::Optional(inner)
            }
            "Union" => {
                let members = split_members(args);
                let has_none = members.iter().any(|m| is_none_type(m));
                if has_none {
                    let inner: Vec<TypeKind> = members
                        .iter()
                        .filter(|m| !is_none_type(m))
                        .map(|m| TypeKind::parse(m))
                        .collect();
                    TypeKind::Optional(inner)
                } else {
                    TypeKind::Unknown
                }
            }
            _ => {
                // PEP 604 unions: `int | None`.
                if let Some(kind) = parse_pipe_union(text) {
                    kind
                } else {
                    TypeKind::Unknown
                }
            }
        }
    }
}

fn is_none_type(text: &str) -> bool {
    let t = text.trim();
    t == "None" || t == "NoneType" || t.ends_with(".NoneType")
}

/// Split `Head[args]` into `("Head", Some("args"))`; no subscript gives
/// `(text, None)`.
fn split_subscript(text: &str) -> (&str, Option<&str>) {
    match text.find('[') {
        Some(open) if text.ends_with(']') => {
            (&text[..open], Some(&text[open + 1..text.len() - 1]))
        }
        _ => (text, None),
    }
}

/// Split generic arguments at top-level commas (bracket-depth aware).
fn split_members(args: Option<&str>) -> Vec<String> {
    let Some(args) = args else { return Vec::new() };
    let mut members = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in args.chars() {
        match c {
            '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            ']' | ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                members.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        members.push(current.trim().to_string());
    }
    members
}

fn parse_members(args: Option<&str>) -> Vec<TypeKind> {
    split_members(args).iter().filter(|m| !is_none_type(m)).map(|m| TypeKind::parse(m)).collect()
}

/// `A | B | None` → `Optional([A, B])`; unions without None stay unknown.
fn parse_pipe_union(text: &str) -> Option<TypeKind> {
    if !text.contains('|') {
        return None;
    }
    let members: Vec<&str> = text.split('|').map(str::trim).collect();
    if members.iter().any(|m| is_none_type(m)) {
        let inner: Vec<TypeKind> =
            members.iter().filter(|m| !is_none_type(m)).map(|m| TypeKind::parse(m)).collect();
        Some(TypeKind::Optional(inner))
    } else {
        None
    }
}

/// Fixed mixed-type fallback for unknown or missing annotations.
///
/// Never empty; callers truncate to [`MAX_CANDIDATES_PER_PARAM`].
pub fn fallback_values() -> Vec<Value> {
    vec![
        Value::Int(0),
        Value::Int(1),
        Value::Int(-1),
        Value::Float(0.0),
        Value::Float(1.0),
        Value::Float(-1.0),
        Value::Str(String::new()),
        Value::Str("x".to_string()),
        Value::Bytes(Vec::new()),
        Value::Bytes(vec![0]),
        Value::Bytes(byte_ramp(101)),
        Value::List(vec![]),
        Value::List(vec![Value::Int(0)]),
        Value::List(vec![Value::Int(1)]),
        Value::Tuple(vec![]),
        Value::Tuple(vec![Value::Int(0)]),
        Value::Tuple(vec![Value::Int(1)]),
        Value::Dict(vec![]),
        Value::Dict(vec![(Value::Str("k".to_string()), Value::Int(0))]),
        Value::Bool(true),
        Value::Bool(false),
        Value::None,
    ]
}

fn byte_ramp(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

/// Edge representatives for a recognized type kind.
///
/// Always non-empty; `Unknown` routes to the global fallback.
pub fn values_for(kind: &TypeKind) -> Vec<Value> {
    match kind {
        TypeKind::Int => vec![
            Value::Int(0),
            Value::Int(1),
            Value::Int(-1),
            Value::Int(i64::MAX),
            Value::Int(i64::MIN),
        ],
        TypeKind::Float => vec![
            Value::Float(0.0),
            Value::Float(-0.0),
            Value::Float(1.0),
            Value::Float(-1.0),
            Value::Float(f64::INFINITY),
            Value::Float(f64::NEG_INFINITY),
            Value::Float(f64::NAN),
        ],
        TypeKind::Bool => vec![Value::Bool(false), Value::Bool(true)],
        TypeKind::Str => vec![
            Value::Str(String::new()),
            Value::Str("x".to_string()),
            Value::Str("x".repeat(256)),
            Value::Str("ünïcödé-☃".to_string()),
        ],
        TypeKind::Bytes => vec![
            Value::Bytes(Vec::new()),
            Value::Bytes(vec![0]),
            Value::Bytes(byte_ramp(50)),
            Value::Bytes(byte_ramp(100)),
            Value::Bytes(byte_ramp(101)),
        ],
        TypeKind::List => vec![
            Value::List(vec![]),
            Value::List(vec![Value::Int(0)]),
            Value::List(vec![Value::Str("x".to_string())]),
        ],
        TypeKind::Tuple => vec![
            Value::Tuple(vec![]),
            Value::Tuple(vec![Value::Int(0)]),
            Value::Tuple(vec![Value::Str("x".to_string())]),
        ],
        TypeKind::Dict => vec![
            Value::Dict(vec![]),
            Value::Dict(vec![(Value::Str("k".to_string()), Value::Int(0))]),
        ],
        TypeKind::Set => vec![Value::Set(vec![]), Value::Set(vec![Value::Int(0)])],
        TypeKind::Optional(inner) => {
            let mut pool = vec![Value::None];
            if inner.is_empty() {
                pool.extend(fallback_values().into_iter().take(2));
            }
            for kind in inner {
                pool.extend(values_for(kind).into_iter().take(2));
            }
            dedupe(pool)
        }
        TypeKind::Unknown => fallback_values(),
    }
}

/// Candidates for one parameter, capped for planning.
///
/// `annotation` is the source text of the declared type, if any.
pub fn candidates_for_param(annotation: Option<&str>) -> Vec<Value> {
    let values = match annotation {
        Some(text) => values_for(&TypeKind::parse(text)),
        None => fallback_values(),
    };
    let mut values = values;
    values.truncate(MAX_CANDIDATES_PER_PARAM);
    values
}

/// Order-preserving dedupe keyed on the rendered literal (NaN-safe).
fn dedupe(values: Vec<Value>) -> Vec<Value> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for v in values {
        if seen.insert(v.python_literal()) {
            out.push(v);
        }
    }
    out
}
