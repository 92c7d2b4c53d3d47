//! Shared helpers for the edgecheck CLI.
//!
//! The CLI is a thin wrapper around `edgecheck-core`; the only logic living
//! here is path normalization and the skip-dir aware discovery of Python
//! files for directory sweeps.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod commands;

/// Directory names never descended into when scanning a tree.
pub const SKIP_DIRS: &[&str] = &[
    ".git",
    ".venv",
    "venv",
    "__pycache__",
    "node_modules",
    "dist",
    "build",
    "site-packages",
];

/// Canonicalize the given path if possible, falling back to joining it onto
/// the current working directory (e.g. for paths that do not exist yet).
pub fn canonicalize_or_current(path: &str) -> Result<PathBuf> {
    let p = Path::new(path);
    if p == Path::new(".") {
        Ok(env::current_dir().context("Failed to get current directory")?)
    } else {
        match p.canonicalize() {
            Ok(canon) => Ok(canon),
            Err(_) => {
                let cwd = env::current_dir().context("Failed to get current directory")?;
                Ok(cwd.join(p))
            }
        }
    }
}

/// Collect all `.py` files under `root`, skipping [`SKIP_DIRS`].
///
/// Traversal is depth-first with sorted directory entries, so the returned
/// order is stable across runs.
pub fn collect_python_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(root, &mut files)?;
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if SKIP_DIRS.contains(&name) {
                continue;
            }
            walk(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("py") {
            files.push(path);
        }
    }
    Ok(())
}
