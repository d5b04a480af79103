//! Wrappers around the external tools the pipeline delegates to.
//!
//! | Stage | Tool | Module |
//! |-------|------|--------|
//! | Clustering | MMseqs2 | [`mmseqs`] |
//! | Alignment | MAFFT | [`mafft`] |
//! | Gene trees | FastTree | [`fasttree`] |
//! | Consensus tree | IQ-TREE | [`iqtree`] |
//! | Supertree | ASTRAL | [`astral`] |
//!
//! Per-family stages run each invocation as an independent unit on a rayon
//! pool. A unit owns its input file, its output file and its scratch
//! directory; a failed unit is recorded as a [`UnitOutcome`] and never stops
//! its siblings.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::utils::validation::{
    is_non_empty_file, truncate_diagnostic, MAX_FAILURES_LISTED, PROGRESS_INTERVAL,
};

pub mod astral;
pub mod fasttree;
pub mod iqtree;
pub mod mafft;
pub mod mmseqs;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} not found in PATH")]
    NotFound { tool: String },

    #[error("{tool} failed ({status}): {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("Expected output was not created: {0}")]
    MissingOutput(PathBuf),

    #[error("No input files found in {0}")]
    NoInputs(PathBuf),

    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("No trees found in {0}")]
    NoTrees(PathBuf),

    #[error("Failed to build worker pool: {0}")]
    Pool(String),
}

/// Result of one independent tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitOutcome {
    /// Unit identifier, usually the input file stem
    pub id: String,
    pub success: bool,
    pub diagnostic: Option<String>,
}

impl UnitOutcome {
    pub fn ok(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            success: true,
            diagnostic: None,
        }
    }

    pub fn failed(id: impl Into<String>, diagnostic: &str) -> Self {
        Self {
            id: id.into(),
            success: false,
            diagnostic: Some(truncate_diagnostic(diagnostic)),
        }
    }
}

/// Success and failure counts for a batch of units
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<UnitOutcome>,
}

impl BatchSummary {
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<UnitOutcome>) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            if outcome.success {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
                summary.failures.push(outcome);
            }
        }
        summary
    }

    /// Log totals and the first few failures
    pub fn log(&self, stage: &str) {
        info!(
            "{stage} complete: {} successful, {} failed",
            self.succeeded, self.failed
        );
        if !self.failures.is_empty() {
            warn!("Failed units (first {MAX_FAILURES_LISTED}):");
            for failure in self.failures.iter().take(MAX_FAILURES_LISTED) {
                warn!(
                    "  {}: {}",
                    failure.id,
                    failure.diagnostic.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }
}

/// Run `unit` over every input on a dedicated pool of `threads` workers.
///
/// Outcomes are returned in input order regardless of completion order.
/// Failures are logged as they happen.
///
/// # Errors
///
/// Returns `ToolError::Pool` if the worker pool cannot be created.
pub fn run_units<T, F>(
    inputs: &[T],
    threads: usize,
    unit: F,
) -> Result<Vec<UnitOutcome>, ToolError>
where
    T: Sync,
    F: Fn(&T) -> UnitOutcome + Sync + Send,
{
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .map_err(|e| ToolError::Pool(e.to_string()))?;

    let total = inputs.len();
    let completed = AtomicUsize::new(0);

    let outcomes = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| {
                let outcome = unit(input);
                if !outcome.success {
                    warn!(
                        "ERROR in {}: {}",
                        outcome.id,
                        outcome.diagnostic.as_deref().unwrap_or("unknown error")
                    );
                }
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % PROGRESS_INTERVAL == 0 {
                    info!("Progress: {done}/{total}");
                }
                outcome
            })
            .collect()
    });

    Ok(outcomes)
}

/// Files directly under `dir` whose names start with `prefix` and end with
/// `suffix`, sorted by path.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be read.
pub fn collect_inputs(dir: &Path, prefix: &str, suffix: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(prefix) && n.ends_with(suffix));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// File name without `prefix` and `suffix`, used as the unit identifier
#[must_use]
pub fn unit_id(path: &Path, prefix: &str, suffix: &str) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.strip_prefix(prefix).unwrap_or(&name);
    name.strip_suffix(suffix).unwrap_or(name).to_string()
}

fn spawn_error(tool: &str, e: std::io::Error) -> ToolError {
    if e.kind() == ErrorKind::NotFound {
        ToolError::NotFound {
            tool: tool.to_string(),
        }
    } else {
        ToolError::Io(e)
    }
}

fn check_status(tool: &str, output: &Output) -> Result<(), ToolError> {
    if output.status.success() {
        return Ok(());
    }
    Err(ToolError::Failed {
        tool: tool.to_string(),
        status: output.status.to_string(),
        stderr: truncate_diagnostic(&String::from_utf8_lossy(&output.stderr)),
    })
}

/// Run a command to completion, capturing stdout and stderr.
///
/// # Errors
///
/// Returns `ToolError::NotFound` if the executable is missing, or
/// `ToolError::Failed` on a non-zero exit status.
pub fn run_checked(tool: &str, cmd: &mut Command) -> Result<Output, ToolError> {
    let output = cmd.output().map_err(|e| spawn_error(tool, e))?;
    check_status(tool, &output)?;
    Ok(output)
}

/// Run a command with stdout redirected to `out_path`.
///
/// Succeeds only if the command exits cleanly and `out_path` is non-empty.
/// On failure a partial `out_path` is removed so later stages never pick it up.
///
/// # Errors
///
/// Returns `ToolError::NotFound`, `ToolError::Failed`, or
/// `ToolError::MissingOutput` when nothing was written.
pub fn run_to_file(tool: &str, cmd: &mut Command, out_path: &Path) -> Result<(), ToolError> {
    let result = redirect_stdout(tool, cmd, out_path);
    if result.is_err() {
        let _ = std::fs::remove_file(out_path);
    }
    result
}

fn redirect_stdout(tool: &str, cmd: &mut Command, out_path: &Path) -> Result<(), ToolError> {
    let out_file = File::create(out_path)?;
    let output = cmd
        .stdout(Stdio::from(out_file))
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| spawn_error(tool, e))?;

    check_status(tool, &output)?;

    if !is_non_empty_file(out_path) {
        return Err(ToolError::MissingOutput(out_path.to_path_buf()));
    }
    Ok(())
}
