use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{print_json, OutputFormat};
use crate::config::PipelineConfig;
use crate::download::download_proteomes;

#[derive(Args)]
pub struct DownloadArgs {
    /// Organism names, one per line
    #[arg(short, long, default_value = "chosen_bacteria.txt")]
    pub input: PathBuf,

    /// Combined proteome FASTA
    #[arg(short, long, default_value = "results/all_bacteria_proteomes.fasta")]
    pub output: PathBuf,

    /// Contact email for NCBI Entrez (overrides the configuration)
    #[arg(long)]
    pub email: Option<String>,
}

/// Execute download subcommand
///
/// # Errors
///
/// Returns an error if the organism list cannot be read or the output
/// cannot be written. Organisms that fail individually are only reported.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: DownloadArgs,
    config: &PipelineConfig,
    format: OutputFormat,
    _verbose: bool,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if args.email.is_some() {
        config.entrez_email = args.email;
    }

    let summary = download_proteomes(&args.input, &args.output, &config)
        .with_context(|| format!("Failed to download proteomes listed in {}", args.input.display()))?;

    match format {
        OutputFormat::Text => {
            println!("Proteome Download");
            println!("{}", "=".repeat(60));
            println!("  Organisms: {}", summary.organisms);
            println!("  Downloaded: {}", summary.downloaded);
            println!("  Proteins: {}", summary.proteins);
            if !summary.failed.is_empty() {
                println!("  Failed:");
                for organism in &summary.failed {
                    println!("    {organism}");
                }
            }
            println!("  Output: {}", args.output.display());
        }
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Tsv => {
            println!("organisms\tdownloaded\tfailed\tproteins");
            println!(
                "{}\t{}\t{}\t{}",
                summary.organisms,
                summary.downloaded,
                summary.failed.len(),
                summary.proteins
            );
        }
    }
    Ok(())
}
