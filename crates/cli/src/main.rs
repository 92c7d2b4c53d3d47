use anyhow::Result;
use clap::{Parser, Subcommand};
use edgecheck::commands::{check_command, rules_command, OutputFormat};
use edgecheck_core::analyzer::AnalyzeOptions;

/// Edge-case crash sweeper for Python functions.
///
/// This CLI is a thin wrapper around `edgecheck-core` (exposed in code as
/// `edgecheck_core`). All substantive logic lives in the library so it can
/// be tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "edgecheck",
    version,
    about = "Edge-case crash sweeper for Python functions",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep a Python file or directory for crash-prone edge cases.
    ///
    /// Each eligible top-level function is called with synthesized edge
    /// inputs, one isolated worker process per trial, and the first failure
    /// per function is reported as a finding.
    Check {
        /// Path to a Python file or a directory to scan.
        path: String,

        /// Wall-clock budget per trial, in milliseconds.
        #[arg(long, default_value_t = 200)]
        budget_ms: u64,

        /// Max input trials per function.
        #[arg(long, default_value_t = 24)]
        max_trials: usize,

        /// Max findings reported per file.
        #[arg(long, default_value_t = 50)]
        max_findings: usize,

        /// Output format.
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Also write a SARIF 2.1.0 report to this file.
        #[arg(long)]
        sarif_out: Option<String>,

        /// Interpreter for worker processes. Defaults to $EDGECHECK_PYTHON,
        /// then `python3`.
        #[arg(long)]
        python: Option<String>,
    },

    /// List the diagnostic codes edgecheck can report.
    Rules {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check { path, budget_ms, max_trials, max_findings, format, sarif_out, python } => {
            let options = AnalyzeOptions {
                budget_ms,
                max_trials_per_fn: max_trials,
                max_findings_per_file: max_findings,
                python: python.unwrap_or_else(edgecheck_core::exec::default_python),
            };
            check_command(&path, &options, format, sarif_out.as_deref())?;
        }
        Command::Rules { json } => rules_command(json)?,
    }

    Ok(())
}
