//! Isolated, time-bounded execution of target code.
//!
//! Every operation against a target file runs in a fresh worker process: a
//! Python interpreter executing the embedded runner script. The worker gets
//! exactly one JSON request on stdin and produces exactly one JSON reply line
//! on stdout, then exits. The orchestrator polls the child under a deadline
//! and kills it on expiry; a drop guard makes termination and reaping
//! unconditional on every exit path. Process isolation is the safety
//! boundary: target code may divide by zero, recurse forever, segfault, or
//! spin, and none of that can take the orchestrator down.

use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::candidates::Value;

const WORKER_SCRIPT: &str = include_str!("worker.py");

/// Environment variable overriding the worker interpreter.
pub const PYTHON_ENV_VAR: &str = "EDGECHECK_PYTHON";

const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Interpreter used when the caller does not specify one.
pub fn default_python() -> String {
    std::env::var(PYTHON_ENV_VAR).unwrap_or_else(|_| "python3".to_string())
}

/// Orchestrator-side execution failures.
///
/// Worker-*reported* failures are data ([`ExecutionOutcome`]), not errors;
/// these variants cover the cases where no usable reply exists at all.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn worker interpreter `{python}`: {source}")]
    Spawn {
        python: String,
        #[source]
        source: std::io::Error,
    },
    #[error("worker protocol error: {0}")]
    Protocol(String),
    #[error("module load failed: {0}")]
    Load(String),
    #[error("module load exceeded its {0} ms budget")]
    LoadTimeout(u64),
}

/// Tagged result of running one trial. Produced exactly once per trial,
/// never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success,
    Failure { exception: String, message: String, stack: String },
    Timeout,
    LoadError { message: String },
}

/// One eligible function reported by module introspection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetFunction {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
}

#[derive(Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum WorkerRequest<'a> {
    Inspect { path: &'a str },
    Call { path: &'a str, function: &'a str, args: Vec<serde_json::Value> },
}

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum WorkerReply {
    Ok {
        #[serde(default)]
        functions: Vec<TargetFunction>,
    },
    Error {
        exception: String,
        message: String,
        #[serde(default)]
        stack: String,
    },
    LoadError {
        message: String,
    },
}

enum WorkerRun {
    Completed(WorkerReply),
    TimedOut,
}

/// Kills and reaps the worker when dropped, unless it already exited.
///
/// This is the unconditional-cleanup path: timeout, protocol error, panic,
/// or orderly completion all funnel through here, so a misbehaving target
/// can never leak a process into later trials.
struct WorkerGuard {
    child: Child,
}

impl WorkerGuard {
    fn terminate(&mut self) {
        match self.child.try_wait() {
            Ok(Some(_)) => {}
            _ => {
                let _ = self.child.kill();
            }
        }
        // Reap; after kill() this returns promptly.
        let _ = self.child.wait();
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// List the eligible top-level functions of a target file.
///
/// Module load runs arbitrary top-level code, so this is process-isolated
/// and budget-bounded like any trial.
pub fn inspect_module(
    python: &str,
    path: &Path,
    budget_ms: u64,
) -> Result<Vec<TargetFunction>, ExecError> {
    let path_str = path.to_string_lossy();
    let request = WorkerRequest::Inspect { path: &path_str };
    match run_worker(python, &request, budget_ms)? {
        WorkerRun::TimedOut => Err(ExecError::LoadTimeout(budget_ms)),
        WorkerRun::Completed(WorkerReply::Ok { functions }) => Ok(functions),
        WorkerRun::Completed(WorkerReply::LoadError { message }) => Err(ExecError::Load(message)),
        WorkerRun::Completed(WorkerReply::Error { exception, message, .. }) => {
            Err(ExecError::Load(format!("{exception}: {message}")))
        }
    }
}

/// Run one trial: call `function` in `path` with `args` in a fresh worker.
///
/// The budget covers the worker's whole lifetime — interpreter startup,
/// module import, and the call itself.
pub fn execute_trial(
    python: &str,
    path: &Path,
    function: &str,
    args: &[Value],
    budget_ms: u64,
) -> Result<ExecutionOutcome, ExecError> {
    let path_str = path.to_string_lossy();
    let request = WorkerRequest::Call {
        path: &path_str,
        function,
        args: args.iter().map(Value::to_wire).collect(),
    };
    let outcome = match run_worker(python, &request, budget_ms)? {
        WorkerRun::TimedOut => ExecutionOutcome::Timeout,
        WorkerRun::Completed(WorkerReply::Ok { .. }) => ExecutionOutcome::Success,
        WorkerRun::Completed(WorkerReply::Error { exception, message, stack }) => {
            ExecutionOutcome::Failure { exception, message, stack }
        }
        WorkerRun::Completed(WorkerReply::LoadError { message }) => {
            ExecutionOutcome::LoadError { message }
        }
    };
    tracing::debug!(function, ?outcome, "trial finished");
    Ok(outcome)
}

/// Spawn one worker, ship the request, and wait for the reply or the
/// deadline, whichever comes first.
fn run_worker(
    python: &str,
    request: &WorkerRequest,
    budget_ms: u64,
) -> Result<WorkerRun, ExecError> {
    let child = Command::new(python)
        .arg("-c")
        .arg(WORKER_SCRIPT)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ExecError::Spawn { python: python.to_string(), source })?;
    let mut guard = WorkerGuard { child };

    // Ship the one-shot request; closing stdin signals end-of-request. A
    // write failure means the worker died early, which the wait loop and
    // reply parsing below surface with more context.
    if let Some(mut stdin) = guard.child.stdin.take() {
        let body = serde_json::to_vec(request)
            .map_err(|e| ExecError::Protocol(format!("request encoding failed: {e}")))?;
        if let Err(e) = stdin.write_all(&body) {
            tracing::debug!(error = %e, "worker stdin write failed");
        }
    }

    let deadline = Instant::now() + Duration::from_millis(budget_ms);
    let status = loop {
        match guard.child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    tracing::debug!(budget_ms, "worker deadline expired, terminating");
                    guard.terminate();
                    return Ok(WorkerRun::TimedOut);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(ExecError::Protocol(format!("waiting on worker failed: {e}")));
            }
        }
    };

    let mut output = String::new();
    if let Some(mut stdout) = guard.child.stdout.take() {
        if let Err(e) = stdout.read_to_string(&mut output) {
            return Err(ExecError::Protocol(format!("reading worker reply failed: {e}")));
        }
    }

    let reply_line = output
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| ExecError::Protocol(format!("worker produced no reply (exit: {status})")))?;
    let reply: WorkerReply = serde_json::from_str(reply_line).map_err(|e| {
        ExecError::Protocol(format!("unparsable worker reply (exit: {status}): {e}"))
    })?;
    Ok(WorkerRun::Completed(reply))
}
