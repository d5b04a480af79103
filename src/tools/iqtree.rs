//! Greedy consensus of gene trees with IQ-TREE.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::tools::{run_checked, ToolError};

/// IQ-TREE output prefix: the output path without its extension
#[must_use]
pub fn consensus_prefix(output_tree: &Path) -> PathBuf {
    output_tree.with_extension("")
}

/// Where IQ-TREE writes the consensus tree for `prefix`
#[must_use]
pub fn contree_path(prefix: &Path) -> PathBuf {
    let mut s: OsString = prefix.as_os_str().to_owned();
    s.push(".contree");
    PathBuf::from(s)
}

/// Build a greedy consensus of the trees in `input_trees` and move it to
/// `output_tree`.
///
/// # Errors
///
/// Returns `ToolError::InputNotFound` if the trees file is missing, a tool
/// error if IQ-TREE fails, or `ToolError::MissingOutput` if no `.contree`
/// was produced.
pub fn build_consensus(
    input_trees: &Path,
    output_tree: &Path,
    config: &PipelineConfig,
) -> Result<PathBuf, ToolError> {
    if !input_trees.is_file() {
        return Err(ToolError::InputNotFound(input_trees.to_path_buf()));
    }
    if let Some(parent) = output_tree.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let prefix = consensus_prefix(output_tree);
    let mut cmd = Command::new(&config.iqtree);
    cmd.arg("-t")
        .arg(input_trees)
        .arg("-con")
        .arg("-pre")
        .arg(&prefix);

    info!("Running {} -t {} -con", config.iqtree, input_trees.display());
    let output = run_checked(&config.iqtree, &mut cmd)?;
    debug!("{}", String::from_utf8_lossy(&output.stdout));

    let contree = contree_path(&prefix);
    if !contree.is_file() {
        return Err(ToolError::MissingOutput(contree));
    }
    std::fs::rename(&contree, output_tree)?;

    info!("Greedy consensus tree written to {}", output_tree.display());
    Ok(output_tree.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_contree_path() {
        let prefix = consensus_prefix(Path::new("trees_nwk/greedy_consensus.nwk"));
        assert_eq!(prefix, PathBuf::from("trees_nwk/greedy_consensus"));
        assert_eq!(
            contree_path(&prefix),
            PathBuf::from("trees_nwk/greedy_consensus.contree")
        );
    }

    #[test]
    fn test_missing_input_trees() {
        let dir = tempfile::tempdir().unwrap();
        let err = build_consensus(
            &dir.path().join("all_trees.tree"),
            &dir.path().join("consensus.nwk"),
            &PipelineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InputNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_without_contree() {
        let dir = tempfile::tempdir().unwrap();
        let trees = dir.path().join("all_trees.tree");
        std::fs::write(&trees, "(A,B);\n").unwrap();

        let config = PipelineConfig {
            iqtree: "true".to_string(),
            ..PipelineConfig::default()
        };
        let err = build_consensus(&trees, &dir.path().join("consensus.nwk"), &config).unwrap_err();
        assert!(matches!(err, ToolError::MissingOutput(_)));
    }
}
