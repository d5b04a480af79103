use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::config::PipelineConfig;
use crate::tools::mmseqs::run_clustering;

#[derive(Args)]
pub struct ClusterArgs {
    /// Combined proteome FASTA
    #[arg(short, long, default_value = "results/all_bacteria_proteomes.fasta")]
    pub input: PathBuf,

    /// Cluster table (representative<TAB>member)
    #[arg(short, long, default_value = "results/all_clusters_mmseqs.tsv")]
    pub output: PathBuf,

    /// Minimum sequence identity (overrides the configuration)
    #[arg(long)]
    pub min_seq_id: Option<f64>,

    /// Minimum alignment coverage (overrides the configuration)
    #[arg(long)]
    pub coverage: Option<f64>,
}

/// Execute cluster subcommand
///
/// # Errors
///
/// Returns an error if the input is missing or any MMseqs2 step fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ClusterArgs,
    config: &PipelineConfig,
    format: OutputFormat,
    _verbose: bool,
) -> anyhow::Result<()> {
    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut config = config.clone();
    if let Some(min_seq_id) = args.min_seq_id {
        config.min_seq_id = min_seq_id;
    }
    if let Some(coverage) = args.coverage {
        config.min_coverage = coverage;
    }
    config.validate()?;

    run_clustering(&args.input, &args.output, &config)
        .with_context(|| format!("Failed to cluster {}", args.input.display()))?;

    match format {
        OutputFormat::Text => {
            println!("Clustering complete");
            println!("  Min sequence identity: {}", config.min_seq_id);
            println!("  Min coverage: {}", config.min_coverage);
            println!("  Clusters: {}", args.output.display());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "input": args.input.display().to_string(),
                "output": args.output.display().to_string(),
                "min_seq_id": config.min_seq_id,
                "min_coverage": config.min_coverage,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("input\toutput\tmin_seq_id\tmin_coverage");
            println!(
                "{}\t{}\t{}\t{}",
                args.input.display(),
                args.output.display(),
                config.min_seq_id,
                config.min_coverage
            );
        }
    }
    Ok(())
}
