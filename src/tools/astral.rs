//! Species supertree from gene trees with ASTRAL.

use std::io::Write;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::tools::{run_checked, ToolError};

/// Non-empty, trimmed lines of a trees file
///
/// # Errors
///
/// Returns an IO error if the file cannot be read.
pub fn read_tree_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// The ASTRAL invocation: `java -Xmx<mem> -jar <jar> ...` when a jar is
/// configured, otherwise the `astral` executable.
#[must_use]
pub fn astral_command(trees: &Path, output: &Path, config: &PipelineConfig) -> Command {
    let mut cmd = if let Some(jar) = &config.astral_jar {
        let mut cmd = Command::new(&config.java);
        cmd.arg(format!("-Xmx{}", config.astral_memory))
            .arg("-jar")
            .arg(jar);
        cmd
    } else {
        Command::new(&config.astral)
    };

    cmd.arg("-i")
        .arg(trees)
        .arg("-t")
        .arg(config.astral_branch_mode.to_string())
        .arg("-o")
        .arg(output);
    cmd
}

/// Build a supertree from the gene trees in `input_trees`, returning the
/// number of input trees.
///
/// # Errors
///
/// Returns `ToolError::InputNotFound` for a missing trees file,
/// `ToolError::NoTrees` if it holds no trees, a tool error if ASTRAL fails,
/// or `ToolError::MissingOutput` if the supertree was not written.
pub fn build_supertree(
    input_trees: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<usize, ToolError> {
    if !input_trees.is_file() {
        return Err(ToolError::InputNotFound(input_trees.to_path_buf()));
    }
    if let Some(jar) = &config.astral_jar {
        if !jar.is_file() {
            return Err(ToolError::InputNotFound(jar.clone()));
        }
    }

    let trees = read_tree_lines(input_trees)?;
    if trees.is_empty() {
        return Err(ToolError::NoTrees(input_trees.to_path_buf()));
    }
    info!("Found {} gene family trees", trees.len());

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    // Normalised copy of the input: one tree per line, no blanks
    let mut tree_list = tempfile::Builder::new().suffix(".trees").tempfile()?;
    for tree in &trees {
        writeln!(tree_list, "{tree}")?;
    }
    tree_list.flush()?;

    let tool = if config.astral_jar.is_some() {
        &config.java
    } else {
        &config.astral
    };

    info!("Running ASTRAL with {} trees", trees.len());
    let result = run_checked(tool, &mut astral_command(tree_list.path(), output, config))?;
    if !result.stdout.is_empty() {
        debug!("ASTRAL output:\n{}", String::from_utf8_lossy(&result.stdout));
    }

    if !output.is_file() {
        return Err(ToolError::MissingOutput(output.to_path_buf()));
    }

    info!("Supertree created: {}", output.display());
    Ok(trees.len())
}
