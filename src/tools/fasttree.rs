//! Maximum-likelihood gene trees with FastTree.
//!
//! Each `aligned_<family>.fasta` yields `tree_<family>.tree` in a scratch
//! directory; the non-empty trees are then concatenated, one Newick string
//! per line, into a single file for the consensus and supertree stages.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::tools::mafft::ALIGNED_PREFIX;
use crate::tools::{
    collect_inputs, run_to_file, run_units, unit_id, BatchSummary, ToolError, UnitOutcome,
};

#[derive(Debug, Serialize)]
pub struct TreeBuildSummary {
    pub batch: BatchSummary,

    /// Trees written to the combined file
    pub combined: usize,

    pub output: PathBuf,
}

fn build_one(alignment: &Path, tree_dir: &Path, config: &PipelineConfig) -> UnitOutcome {
    let id = unit_id(alignment, ALIGNED_PREFIX, ".fasta");
    let tree_path = tree_dir.join(format!("tree_{id}.tree"));

    let mut cmd = Command::new(&config.fasttree);
    cmd.args(&config.fasttree_args).arg(alignment);

    match run_to_file(&config.fasttree, &mut cmd, &tree_path) {
        Ok(()) => UnitOutcome::ok(id),
        Err(e) => UnitOutcome::failed(id, &e.to_string()),
    }
}

/// Concatenate the trimmed contents of `tree_files` into `output`, one per
/// line, skipping empty files. Returns the number of trees written.
///
/// # Errors
///
/// Returns an IO error if any file cannot be read or the output written.
pub fn combine_trees(tree_files: &[PathBuf], output: &Path) -> std::io::Result<usize> {
    let mut out = BufWriter::new(File::create(output)?);
    let mut written = 0;

    for tree_file in tree_files {
        let content = std::fs::read_to_string(tree_file)?;
        let tree = content.trim();
        if !tree.is_empty() {
            writeln!(out, "{tree}")?;
            written += 1;
        }
    }

    out.flush()?;
    Ok(written)
}

/// Build one tree per alignment in `input_dir` and combine them into `output`.
///
/// # Errors
///
/// Returns `ToolError::NoInputs` if there are no `aligned_*.fasta` files, or an
/// IO/pool error. Individual FastTree failures are reported in the summary.
pub fn build_gene_trees(
    input_dir: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<TreeBuildSummary, ToolError> {
    let alignments = collect_inputs(input_dir, ALIGNED_PREFIX, ".fasta")?;
    if alignments.is_empty() {
        return Err(ToolError::NoInputs(input_dir.to_path_buf()));
    }

    let output_parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&output_parent)?;

    // Individual trees live next to the final output until combined
    let tree_dir = tempfile::Builder::new()
        .prefix(".temp_trees_")
        .tempdir_in(&output_parent)?;

    info!("Found {} alignments", alignments.len());
    info!("Running {} parallel FastTree processes", config.threads);

    let outcomes = run_units(&alignments, config.threads, |alignment| {
        build_one(alignment, tree_dir.path(), config)
    })?;
    let batch = BatchSummary::from_outcomes(outcomes);
    batch.log("Tree building");

    let tree_files = collect_inputs(tree_dir.path(), "tree_", ".tree")?;
    if tree_files.is_empty() {
        warn!("No tree files found to combine");
    }
    let combined = combine_trees(&tree_files, output)?;
    info!("Combined {combined} trees into {}", output.display());

    Ok(TreeBuildSummary {
        batch,
        combined,
        output: output.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_trees_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("tree_a.tree");
        let b = dir.path().join("tree_b.tree");
        let c = dir.path().join("tree_c.tree");
        std::fs::write(&a, "(A,B,C);\n").unwrap();
        std::fs::write(&b, "  \n").unwrap();
        std::fs::write(&c, "((A,B),C);").unwrap();

        let out = dir.path().join("all_trees.tree");
        let n = combine_trees(&[a, b, c], &out).unwrap();

        assert_eq!(n, 2);
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "(A,B,C);\n((A,B),C);\n"
        );
    }

    #[test]
    fn test_no_alignments() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("family_0001.fasta"), ">a\nM\n").unwrap();
        let err = build_gene_trees(
            dir.path(),
            &dir.path().join("all_trees.tree"),
            &PipelineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::NoInputs(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_and_combine_with_stand_in_tool() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("alignments");
        std::fs::create_dir(&input_dir).unwrap();
        std::fs::write(input_dir.join("aligned_family_0001.fasta"), "(A,B);\n").unwrap();
        std::fs::write(input_dir.join("aligned_family_0002.fasta"), "").unwrap();
        std::fs::write(input_dir.join("aligned_family_0003.fasta"), "(B,C);\n").unwrap();

        let config = PipelineConfig {
            fasttree: "cat".to_string(),
            fasttree_args: Vec::new(),
            ..PipelineConfig::default()
        };

        let output = dir.path().join("results").join("all_trees.tree");
        let summary = build_gene_trees(&input_dir, &output, &config).unwrap();

        assert_eq!(summary.batch.succeeded, 2);
        assert_eq!(summary.batch.failed, 1);
        assert_eq!(summary.batch.failures[0].id, "family_0002");
        assert_eq!(summary.combined, 2);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "(A,B);\n(B,C);\n"
        );

        // Scratch tree directory is gone once the build returns
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("results"))
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".temp_trees_"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
