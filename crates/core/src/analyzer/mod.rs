//! Per-file analysis orchestration.
//!
//! Drives the syntax pass, module inspection, candidate generation, trial
//! planning, and isolated execution for every eligible function in one file.
//! Exploration of a function halts at its first non-success outcome (one
//! finding per function per run); the file halts at the finding cap. Both
//! caps are hard stops.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::candidates::{self, Value};
use crate::diagnostics::{self, Classification};
use crate::exec::{self, ExecError, ExecutionOutcome, TargetFunction};
use crate::model::{Finding, Repro};
use crate::plan::TrialPlan;
use crate::syntax::{self, FunctionSig, RiskySpan, SourceIndex};

/// Budget multiplier for the one-time module inspection: an import pays
/// interpreter startup and arbitrary top-level code, which can legitimately
/// dwarf a single call budget.
const INSPECT_BUDGET_FACTOR: u64 = 10;

/// Knobs supplied by the configuration layer.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Wall-clock budget for one trial's worker, in milliseconds.
    pub budget_ms: u64,
    /// Hard cap on trials per function.
    pub max_trials_per_fn: usize,
    /// Hard cap on findings per file.
    pub max_findings_per_file: usize,
    /// Interpreter used to run workers.
    pub python: String,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        AnalyzeOptions {
            budget_ms: 200,
            max_trials_per_fn: 24,
            max_findings_per_file: 50,
            python: exec::default_python(),
        }
    }
}

/// Whole-file analysis failures. These never abort a multi-file batch; the
/// caller reports them per file and moves on.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },
    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// Analyze the top-level functions of one Python file.
///
/// Returns findings in function-discovery order, at most one per function.
/// A file carrying the ignore pragma returns an empty set without spawning
/// any worker. Re-analyzing an unchanged file with the same options yields
/// identical findings.
pub fn analyze_file(path: &Path, options: &AnalyzeOptions) -> Result<Vec<Finding>, AnalyzeError> {
    let path = fs::canonicalize(path)
        .map_err(|source| AnalyzeError::Io { path: path.to_path_buf(), source })?;
    let source = fs::read_to_string(&path)
        .map_err(|source| AnalyzeError::Io { path: path.clone(), source })?;

    if syntax::has_ignore_pragma(&source) {
        tracing::debug!(path = %path.display(), "ignore pragma present, skipping file");
        return Ok(Vec::new());
    }

    let index = SourceIndex::parse(&source);

    let inspect_budget = options.budget_ms.saturating_mul(INSPECT_BUDGET_FACTOR);
    let functions =
        exec::inspect_module(&options.python, &path, inspect_budget).map_err(|e| match e {
            ExecError::Load(message) => AnalyzeError::Load { path: path.clone(), message },
            ExecError::LoadTimeout(ms) => AnalyzeError::Load {
                path: path.clone(),
                message: format!("module load exceeded its {ms} ms budget"),
            },
            other => AnalyzeError::Exec(other),
        })?;
    tracing::debug!(path = %path.display(), functions = functions.len(), "module inspected");

    let mut findings = Vec::new();
    for function in &functions {
        if findings.len() >= options.max_findings_per_file {
            tracing::debug!(path = %path.display(), "finding cap reached, stopping file");
            break;
        }
        if let Some(finding) = explore_function(&path, function, &index, options)? {
            findings.push(finding);
        }
    }
    Ok(findings)
}

/// Run trials for one function until the first failure or exhaustion.
fn explore_function(
    path: &Path,
    function: &TargetFunction,
    index: &SourceIndex,
    options: &AnalyzeOptions,
) -> Result<Option<Finding>, AnalyzeError> {
    let sig = index.function(&function.name);

    let sets: Vec<Vec<Value>> = function
        .params
        .iter()
        .map(|param| {
            let annotation = sig
                .and_then(|s| s.params.iter().find(|p| &p.name == param))
                .and_then(|p| p.annotation.as_deref());
            candidates::candidates_for_param(annotation)
        })
        .collect();

    for args in TrialPlan::new(sets, options.max_trials_per_fn) {
        let outcome =
            exec::execute_trial(&options.python, path, &function.name, &args, options.budget_ms)?;
        match outcome {
            ExecutionOutcome::Success => continue,
            ExecutionOutcome::LoadError { message } => {
                // The module imported at inspect time but not anymore; treat
                // as a file-level load failure.
                return Err(AnalyzeError::Load { path: path.to_path_buf(), message });
            }
            ExecutionOutcome::Timeout => {
                let classification = diagnostics::classify_timeout();
                let message = "TimeoutError: execution exceeded budget".to_string();
                return Ok(Some(build_finding(
                    path,
                    function,
                    sig,
                    classification,
                    None,
                    message,
                    String::new(),
                    &args,
                )));
            }
            ExecutionOutcome::Failure { exception, message, stack } => {
                let classification = diagnostics::classify(&exception, &message);
                let display = if message.is_empty() {
                    exception.clone()
                } else {
                    format!("{exception}: {message}")
                };
                return Ok(Some(build_finding(
                    path,
                    function,
                    sig,
                    classification,
                    Some(&exception),
                    display,
                    stack,
                    &args,
                )));
            }
        }
    }
    Ok(None)
}

#[allow(clippy::too_many_arguments)]
fn build_finding(
    path: &Path,
    function: &TargetFunction,
    sig: Option<&FunctionSig>,
    classification: Classification,
    exception: Option<&str>,
    message: String,
    stack: String,
    args: &[Value],
) -> Finding {
    let decl_line = sig.map(|s| s.line).unwrap_or(1);
    let spans: &[RiskySpan] = sig.map(|s| s.risky_spans.as_slice()).unwrap_or(&[]);

    let line = line_from_stack(&stack, path, decl_line);
    let (start_col, end_col) = syntax::match_span(spans, line, exception.unwrap_or(""));

    Finding {
        file: path.to_path_buf(),
        function: function.name.clone(),
        param_names: function.params.clone(),
        line,
        start_col,
        end_col,
        kind: classification.kind,
        code: classification.code.id.to_string(),
        title: classification.code.title.to_string(),
        severity: classification.code.default_severity,
        message,
        hint: classification.code.hint.to_string(),
        repro: Repro { args: args.iter().map(Value::python_literal).collect() },
        stack,
    }
}

/// Most relevant line for the target file in a Python traceback: the last
/// `File "<path>", line N` entry naming the file. Falls back to the
/// declaration line when the stack has nothing usable.
fn line_from_stack(stack: &str, path: &Path, default_line: usize) -> usize {
    if stack.is_empty() {
        return default_line;
    }
    let needle = path.to_string_lossy();
    let mut line_num = default_line;
    for raw in stack.lines() {
        let entry = raw.trim();
        if !entry.starts_with("File \"") || !entry.contains(needle.as_ref()) {
            continue;
        }
        for part in entry.split(',') {
            if let Some(rest) = part.trim().strip_prefix("line ") {
                if let Ok(num) = rest.trim().parse::<usize>() {
                    if num > 0 {
                        line_num = num;
                    }
                }
            }
        }
    }
    line_num
}
