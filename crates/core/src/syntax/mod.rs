//! Syntax pass over target Python source.
//!
//! Built on tree-sitter, which always yields a tree; authoritative parse
//! failures (source Python's own parser rejects) surface later as a
//! whole-file load error from the worker. This pass only needs three things:
//! where each top-level function is declared, the source text of its
//! parameter annotations, and the spans of crash-prone sub-expressions used
//! for diagnostic attribution.

use std::collections::HashMap;

use tree_sitter::{Node, Parser};

/// Lines scanned for the ignore pragma.
const PRAGMA_WINDOW: usize = 5;

/// Pragma that excludes a whole file from analysis.
pub const IGNORE_PRAGMA: &str = "# edgecheck: ignore-file";

/// Widest-possible fallback span, underlining most of a line.
pub const WIDE_SPAN: (usize, usize) = (0, 120);

/// Crash-prone construct kinds we can attribute a failure to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskKind {
    Division,
    Subscript,
}

/// Location of one risky sub-expression. Columns are 0-based; the end column
/// is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskySpan {
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub kind: RiskKind,
}

/// One declared parameter: name plus the source text of its annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSig {
    pub name: String,
    pub annotation: Option<String>,
}

/// Everything the engine needs to know about one top-level function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
    pub name: String,
    /// 1-based declaration line (the `def` line, past any decorators).
    pub line: usize,
    pub params: Vec<ParamSig>,
    pub risky_spans: Vec<RiskySpan>,
}

/// Per-file syntax facts, keyed by function name.
#[derive(Debug, Default)]
pub struct SourceIndex {
    functions: HashMap<String, FunctionSig>,
}

impl SourceIndex {
    /// Build the index for one source file. Never fails: an unusable parser
    /// or tree degrades to an empty index, and downstream attribution falls
    /// back to whole-line spans.
    pub fn parse(source: &str) -> SourceIndex {
        let mut parser = Parser::new();
        if parser.set_language(&tree_sitter_python::LANGUAGE.into()).is_err() {
            tracing::warn!("tree-sitter python grammar rejected; span attribution disabled");
            return SourceIndex::default();
        }
        let Some(tree) = parser.parse(source, None) else {
            tracing::warn!("tree-sitter produced no tree; span attribution disabled");
            return SourceIndex::default();
        };

        let mut functions = HashMap::new();
        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            let func_node = match child.kind() {
                "function_definition" => Some(child),
                "decorated_definition" => inner_function(child),
                _ => None,
            };
            if let Some(node) = func_node {
                if let Some(sig) = function_sig(node, source) {
                    // Redefinition: the later def wins, as at runtime.
                    functions.insert(sig.name.clone(), sig);
                }
            }
        }
        SourceIndex { functions }
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSig> {
        self.functions.get(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// True if one of the first few lines carries the ignore pragma.
pub fn has_ignore_pragma(source: &str) -> bool {
    source
        .lines()
        .take(PRAGMA_WINDOW)
        .any(|line| line.trim().eq_ignore_ascii_case(IGNORE_PRAGMA))
}

/// Pick the column span that best matches a failure on `line`.
///
/// Preference order: a kind-matching span on the line (`Division` for
/// division-by-zero failures, `Subscript` for index failures), then any span
/// on the line, then [`WIDE_SPAN`]. Ties break on smallest start column.
pub fn match_span(spans: &[RiskySpan], line: usize, exception: &str) -> (usize, usize) {
    let name = exception.rsplit('.').next().unwrap_or(exception);
    let wanted = match name {
        "ZeroDivisionError" => Some(RiskKind::Division),
        "IndexError" => Some(RiskKind::Subscript),
        _ => None,
    };

    let best = spans
        .iter()
        .filter(|s| s.line == line && wanted.map_or(true, |k| s.kind == k))
        .min_by_key(|s| s.start_col)
        .or_else(|| spans.iter().filter(|s| s.line == line).min_by_key(|s| s.start_col));

    match best {
        Some(span) => (span.start_col, span.end_col),
        None => WIDE_SPAN,
    }
}

fn inner_function<'a>(decorated: Node<'a>) -> Option<Node<'a>> {
    let mut cursor = decorated.walk();
    let found = decorated.children(&mut cursor).find(|c| c.kind() == "function_definition");
    found
}

fn node_text<'a>(node: Node<'a>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn child_by_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn function_sig(node: Node, source: &str) -> Option<FunctionSig> {
    let name = node_text(node.child_by_field_name("name")?, source).to_string();
    let line = node.start_position().row + 1;

    let params = match node.child_by_field_name("parameters") {
        Some(params_node) => extract_params(params_node, source),
        None => Vec::new(),
    };

    let mut risky_spans = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        collect_risky(body, source, &mut risky_spans);
    }

    Some(FunctionSig { name, line, params, risky_spans })
}

/// Extract parameter names and annotation text from a `parameters` node.
fn extract_params(params_node: Node, source: &str) -> Vec<ParamSig> {
    let mut out = Vec::new();
    let mut cursor = params_node.walk();
    for child in params_node.children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                out.push(ParamSig { name: node_text(child, source).to_string(), annotation: None });
            }
            "typed_parameter" => {
                // The identifier nests inside a splat pattern for `*args: T`
                // and `**kwargs: T`.
                let name = child_by_kind(child, "identifier")
                    .or_else(|| {
                        child_by_kind(child, "list_splat_pattern")
                            .and_then(|splat| child_by_kind(splat, "identifier"))
                    })
                    .or_else(|| {
                        child_by_kind(child, "dictionary_splat_pattern")
                            .and_then(|splat| child_by_kind(splat, "identifier"))
                    })
                    .map(|n| node_text(n, source).to_string());
                let annotation = child
                    .child_by_field_name("type")
                    .map(|n| node_text(n, source).trim().to_string());
                if let Some(name) = name {
                    out.push(ParamSig { name, annotation });
                }
            }
            "default_parameter" => {
                let name = child
                    .child_by_field_name("name")
                    .or_else(|| child_by_kind(child, "identifier"))
                    .map(|n| node_text(n, source).to_string());
                if let Some(name) = name {
                    out.push(ParamSig { name, annotation: None });
                }
            }
            "typed_default_parameter" => {
                let name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source).to_string());
                let annotation = child
                    .child_by_field_name("type")
                    .map(|n| node_text(n, source).trim().to_string());
                if let Some(name) = name {
                    out.push(ParamSig { name, annotation });
                }
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                if let Some(id) = child_by_kind(child, "identifier") {
                    out.push(ParamSig {
                        name: node_text(id, source).to_string(),
                        annotation: None,
                    });
                }
            }
            _ => {}
        }
    }
    out
}

/// Recursively collect risky sub-expression spans inside a function body.
///
/// Division is `/` only (floor division truncates instead of raising on the
/// same inputs); subscripts cover indexing and slicing.
fn collect_risky(node: Node, source: &str, spans: &mut Vec<RiskySpan>) {
    match node.kind() {
        "binary_operator" => {
            let is_division = node
                .child_by_field_name("operator")
                .map(|op| node_text(op, source) == "/")
                .unwrap_or(false);
            if is_division {
                spans.push(span_of(node, RiskKind::Division));
            }
        }
        "subscript" => {
            spans.push(span_of(node, RiskKind::Subscript));
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_risky(child, source, spans);
    }
}

fn span_of(node: Node, kind: RiskKind) -> RiskySpan {
    let start = node.start_position();
    let end = node.end_position();
    // Multi-line nodes degrade to a best-effort one-column width.
    let end_col = if end.row == start.row { end.column } else { start.column + 1 };
    RiskySpan { line: start.row + 1, start_col: start.column, end_col, kind }
}
