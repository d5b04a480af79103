//! All-vs-all search and clustering with MMseqs2.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::tools::{run_checked, ToolError};
use crate::utils::validation::is_non_empty_file;

/// Build the four MMseqs2 invocations for a clustering run.
///
/// Database paths live under `work_dir`; the returned commands are
/// `createdb`, `search`, `cluster` and `createtsv`, in that order.
#[must_use]
pub fn clustering_commands(
    input_fasta: &Path,
    output_tsv: &Path,
    work_dir: &Path,
    config: &PipelineConfig,
) -> Vec<Command> {
    let seq_db = work_dir.join("proteomeDB");
    let align_db = work_dir.join("alignDB");
    let cluster_db = work_dir.join("clusterDB");
    let tmp = work_dir.join("tmp");

    let mut createdb = Command::new(&config.mmseqs);
    createdb.arg("createdb").arg(input_fasta).arg(&seq_db);

    let mut search = Command::new(&config.mmseqs);
    search
        .arg("search")
        .arg(&seq_db)
        .arg(&seq_db)
        .arg(&align_db)
        .arg(&tmp)
        .arg("-e")
        .arg(config.evalue.to_string())
        .arg("--threads")
        .arg(config.threads.to_string());

    let mut cluster = Command::new(&config.mmseqs);
    cluster
        .arg("cluster")
        .arg(&seq_db)
        .arg(&cluster_db)
        .arg(&tmp)
        .arg("--min-seq-id")
        .arg(config.min_seq_id.to_string())
        .arg("-c")
        .arg(config.min_coverage.to_string())
        .arg("--cluster-mode")
        .arg(config.cluster_mode.to_string())
        .arg("--cov-mode")
        .arg(config.cov_mode.to_string())
        .arg("--threads")
        .arg(config.threads.to_string());

    let mut createtsv = Command::new(&config.mmseqs);
    createtsv
        .arg("createtsv")
        .arg(&seq_db)
        .arg(&seq_db)
        .arg(&cluster_db)
        .arg(output_tsv);

    vec![createdb, search, cluster, createtsv]
}

/// Cluster `input_fasta` and write the `representative<TAB>member` table.
///
/// Databases are built in a scratch directory that is removed afterwards.
///
/// # Errors
///
/// Returns `ToolError::InputNotFound` if the input is missing, a tool error if
/// any MMseqs2 step fails, or `ToolError::MissingOutput` if no table was written.
pub fn run_clustering(
    input_fasta: &Path,
    output_tsv: &Path,
    config: &PipelineConfig,
) -> Result<(), ToolError> {
    if !input_fasta.is_file() {
        return Err(ToolError::InputNotFound(input_fasta.to_path_buf()));
    }
    if let Some(parent) = output_tsv.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let work_dir = tempfile::Builder::new().prefix("mmseqs_").tempdir()?;
    std::fs::create_dir_all(work_dir.path().join("tmp"))?;
    debug!("MMseqs2 work dir: {}", work_dir.path().display());

    for mut cmd in clustering_commands(input_fasta, output_tsv, work_dir.path(), config) {
        let step = cmd
            .get_args()
            .next()
            .map(|a| a.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Running mmseqs {step}");
        run_checked(&config.mmseqs, &mut cmd)?;
    }

    if !is_non_empty_file(output_tsv) {
        return Err(ToolError::MissingOutput(output_tsv.to_path_buf()));
    }

    info!("Clustering results saved to: {}", output_tsv.display());
    // work_dir is removed on drop
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_clustering_commands() {
        let config = PipelineConfig::default();
        let cmds = clustering_commands(
            Path::new("all.fasta"),
            Path::new("clusters.tsv"),
            Path::new("/work"),
            &config,
        );

        assert_eq!(cmds.len(), 4);
        assert_eq!(args(&cmds[0]), vec!["createdb", "all.fasta", "/work/proteomeDB"]);

        let search = args(&cmds[1]);
        assert_eq!(search[0], "search");
        assert_eq!(search[1], search[2], "all-vs-all uses the same database twice");
        assert!(search.windows(2).any(|w| w == ["--threads", "4"]));

        let cluster = args(&cmds[2]);
        assert!(cluster.windows(2).any(|w| w == ["--min-seq-id", "0.8"]));
        assert!(cluster.windows(2).any(|w| w == ["--cluster-mode", "2"]));
        assert!(cluster.windows(2).any(|w| w == ["--cov-mode", "3"]));

        assert_eq!(args(&cmds[3]).last().map(String::as_str), Some("clusters.tsv"));
        assert_eq!(cmds[0].get_program(), "mmseqs");
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_clustering(
            &dir.path().join("absent.fasta"),
            &dir.path().join("out.tsv"),
            &PipelineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InputNotFound(_)));
    }
}
