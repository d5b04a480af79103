use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{print_json, OutputFormat};
use crate::config::PipelineConfig;
use crate::tools::mafft::align_families;
use crate::tools::BatchSummary;
use crate::utils::validation::MAX_FAILURES_LISTED;

#[derive(Args)]
pub struct AlignArgs {
    /// Directory of family FASTA files
    #[arg(short, long, default_value = "results/family_fastas")]
    pub input_dir: PathBuf,

    /// Directory for the aligned files
    #[arg(short, long, default_value = "results/alignments")]
    pub output_dir: PathBuf,
}

/// Execute align subcommand
///
/// # Errors
///
/// Returns an error if there is nothing to align or the batch cannot start.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: AlignArgs,
    config: &PipelineConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let summary = align_families(&args.input_dir, &args.output_dir, config)
        .with_context(|| format!("Failed to align families in {}", args.input_dir.display()))?;

    print_batch("Alignment", &summary, format, verbose)?;
    Ok(())
}

/// Report a batch of tool runs in the selected format
pub(crate) fn print_batch(
    stage: &str,
    summary: &BatchSummary,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{stage}");
            println!("{}", "=".repeat(60));
            println!("  Units: {}", summary.total);
            println!("  Successful: {}", summary.succeeded);
            println!("  Failed: {}", summary.failed);

            let limit = if verbose {
                summary.failures.len()
            } else {
                MAX_FAILURES_LISTED
            };
            for failure in summary.failures.iter().take(limit) {
                println!(
                    "    {}: {}",
                    failure.id,
                    failure.diagnostic.as_deref().unwrap_or("unknown error")
                );
            }
        }
        OutputFormat::Json => print_json(summary)?,
        OutputFormat::Tsv => {
            println!("id\tsuccess\tdiagnostic");
            for failure in &summary.failures {
                println!(
                    "{}\t{}\t{}",
                    failure.id,
                    failure.success,
                    failure.diagnostic.as_deref().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}
