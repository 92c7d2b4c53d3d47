use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use edgecheck_core::analyzer::{self, AnalyzeOptions};
use edgecheck_core::model::Finding;
use edgecheck_core::report;

use crate::{canonicalize_or_current, collect_python_files};

/// Stdout format for the sweep results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Sweep a Python file or directory and report findings.
pub fn check_command(
    path: &str,
    options: &AnalyzeOptions,
    format: OutputFormat,
    sarif_out: Option<&str>,
) -> Result<()> {
    let target = canonicalize_or_current(path)?;
    if !target.exists() {
        return Err(anyhow!("Path not found: {}", target.display()));
    }

    let files: Vec<PathBuf> = if target.is_dir() {
        let files = collect_python_files(&target)?;
        eprintln!("[edgecheck] scanning {} Python files under {}", files.len(), target.display());
        files
    } else {
        if target.extension().and_then(|e| e.to_str()) != Some("py") {
            return Err(anyhow!(
                "Expected a .py file or a directory, got: {}",
                target.display()
            ));
        }
        vec![target.clone()]
    };

    let findings = analyze_many(&files, options);

    if let Some(out_path) = sarif_out {
        let sarif = report::to_sarif(&findings);
        let body = serde_json::to_string_pretty(&sarif).context("Failed to serialize SARIF")?;
        fs::write(out_path, body)
            .with_context(|| format!("Failed to write SARIF to {out_path}"))?;
        eprintln!("[edgecheck] wrote SARIF: {out_path}");
    }

    match format {
        OutputFormat::Human => print!("{}", report::render_human(&findings)),
        OutputFormat::Json => {
            let doc = report::to_json(&findings);
            let serialized = serde_json::to_string_pretty(&doc)
                .context("Failed to serialize findings to JSON")?;
            println!("{}", serialized);
        }
    }
    Ok(())
}

/// Analyze many files and concatenate their findings.
///
/// A failure on one file is reported to stderr and never aborts the batch;
/// the remaining files still contribute results.
pub fn analyze_many(files: &[PathBuf], options: &AnalyzeOptions) -> Vec<Finding> {
    let mut all = Vec::new();
    for file in files {
        match analyzer::analyze_file(file, options) {
            Ok(mut findings) => all.append(&mut findings),
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "analysis failed");
                eprintln!("[edgecheck] error analyzing {}: {e}", file.display());
            }
        }
    }
    all
}
