//! Multiple sequence alignment of family FASTA files with MAFFT.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::config::PipelineConfig;
use crate::tools::{
    collect_inputs, run_to_file, run_units, unit_id, BatchSummary, ToolError, UnitOutcome,
};

pub const ALIGNED_PREFIX: &str = "aligned_";

/// `family_0001.fasta` -> `<output_dir>/aligned_family_0001.fasta`
#[must_use]
pub fn aligned_path(input: &Path, output_dir: &Path) -> PathBuf {
    let id = unit_id(input, "", ".fasta");
    output_dir.join(format!("{ALIGNED_PREFIX}{id}.fasta"))
}

fn align_one(
    input: &Path,
    output_dir: &Path,
    scratch_root: &Path,
    config: &PipelineConfig,
) -> UnitOutcome {
    let id = unit_id(input, "", ".fasta");

    // Private scratch directory per unit
    let scratch = match tempfile::Builder::new()
        .prefix(&format!("{id}_"))
        .tempdir_in(scratch_root)
    {
        Ok(dir) => dir,
        Err(e) => return UnitOutcome::failed(id, &e.to_string()),
    };

    let mut cmd = Command::new(&config.mafft);
    cmd.args(&config.mafft_args)
        .arg(input)
        .env("MAFFT_TMPDIR", scratch.path());

    match run_to_file(&config.mafft, &mut cmd, &aligned_path(input, output_dir)) {
        Ok(()) => UnitOutcome::ok(id),
        Err(e) => UnitOutcome::failed(id, &e.to_string()),
    }
}

/// Align every `*.fasta` in `input_dir` into `output_dir`.
///
/// # Errors
///
/// Returns `ToolError::NoInputs` if `input_dir` holds no FASTA files, or an
/// IO/pool error if the batch cannot be set up. Failures of individual
/// alignments are reported in the returned summary instead.
pub fn align_families(
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
) -> Result<BatchSummary, ToolError> {
    let inputs = collect_inputs(input_dir, "", ".fasta")?;
    if inputs.is_empty() {
        return Err(ToolError::NoInputs(input_dir.to_path_buf()));
    }

    std::fs::create_dir_all(output_dir)?;
    let scratch_root = tempfile::Builder::new().prefix("mafft_tmp_").tempdir()?;

    info!("Found {} families to align", inputs.len());
    info!("MAFFT arguments: {}", config.mafft_args.join(" "));
    info!("Threads: {}", config.threads);

    let outcomes = run_units(&inputs, config.threads, |input| {
        align_one(input, output_dir, scratch_root.path(), config)
    })?;

    let summary = BatchSummary::from_outcomes(outcomes);
    summary.log("Alignment");
    info!("Alignments saved to: {}", output_dir.display());

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_path() {
        assert_eq!(
            aligned_path(Path::new("in/family_0007.fasta"), Path::new("out")),
            PathBuf::from("out/aligned_family_0007.fasta")
        );
    }

    #[test]
    fn test_no_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let err = align_families(dir.path(), &dir.path().join("out"), &PipelineConfig::default())
            .unwrap_err();
        assert!(matches!(err, ToolError::NoInputs(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_units_do_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("families");
        std::fs::create_dir(&input_dir).unwrap();
        std::fs::write(input_dir.join("family_0001.fasta"), ">A_b\nMK\n").unwrap();
        std::fs::write(input_dir.join("family_0002.fasta"), "").unwrap();

        // `cat` stands in for the aligner: empty input yields empty output
        let config = PipelineConfig {
            mafft: "cat".to_string(),
            mafft_args: Vec::new(),
            threads: 2,
            ..PipelineConfig::default()
        };

        let out = dir.path().join("alignments");
        let summary = align_families(&input_dir, &out, &config).unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failures[0].id, "family_0002");
        assert!(!out.join("aligned_family_0002.fasta").exists());
        assert_eq!(
            std::fs::read_to_string(out.join("aligned_family_0001.fasta")).unwrap(),
            ">A_b\nMK\n"
        );
    }
}
