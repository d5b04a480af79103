use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{print_json, OutputFormat};
use crate::config::PipelineConfig;
use crate::output::family_fasta::write_family_fastas;
use crate::parsing::fasta::{extract_sequences, is_fasta_file, MISSING_SAMPLE_SIZE};
use crate::parsing::genes::read_genes_file;

#[derive(Args)]
pub struct ExtractArgs {
    /// Combined proteome FASTA (plain or gzipped)
    #[arg(short = 'p', long, default_value = "results/all_bacteria_proteomes.fasta")]
    pub fasta: PathBuf,

    /// Gene list written by `orthologs`
    #[arg(short, long, default_value = "results/all_genes_for_alignment.txt")]
    pub genes: PathBuf,

    /// Directory for the per-family FASTA files
    #[arg(short, long, default_value = "results/family_fastas")]
    pub output_dir: PathBuf,
}

#[derive(Serialize)]
struct ExtractReport {
    families: usize,
    target_genes: usize,
    found_genes: usize,
    missing_genes: usize,
    missing_sample: Vec<String>,
    files_created: usize,
    families_skipped: usize,
    records_written: usize,
    output_dir: String,
}

/// Execute extract subcommand
///
/// # Errors
///
/// Returns an error if the gene list or FASTA cannot be read, or the family
/// files cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ExtractArgs,
    _config: &PipelineConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    info!("Loading gene list from {}", args.genes.display());
    let families = read_genes_file(&args.genes)
        .with_context(|| format!("Failed to read gene list {}", args.genes.display()))?;

    let targets: HashSet<String> = families
        .iter()
        .flat_map(|f| f.members.iter().cloned())
        .collect();
    info!(
        "Loaded {} families with {} unique genes",
        families.len(),
        targets.len()
    );

    if !is_fasta_file(&args.fasta) {
        warn!("{} does not have a FASTA extension", args.fasta.display());
    }
    info!("Extracting sequences from {}", args.fasta.display());
    let extraction = extract_sequences(&args.fasta, &targets)
        .with_context(|| format!("Failed to read sequences from {}", args.fasta.display()))?;

    let summary = write_family_fastas(&families, &extraction.sequences, &args.output_dir)
        .with_context(|| {
            format!("Failed to write family FASTA files to {}", args.output_dir.display())
        })?;
    if summary.created.is_empty() {
        warn!("No family FASTA files were created");
    }

    let report = ExtractReport {
        families: families.len(),
        target_genes: targets.len(),
        found_genes: extraction.found_count(),
        missing_genes: extraction.missing.len(),
        missing_sample: extraction
            .missing_sample(MISSING_SAMPLE_SIZE)
            .into_iter()
            .map(str::to_string)
            .collect(),
        files_created: summary.created.len(),
        families_skipped: summary.skipped_no_genes,
        records_written: summary.records_written,
        output_dir: args.output_dir.display().to_string(),
    };

    match format {
        OutputFormat::Text => {
            println!("Sequence Extraction");
            println!("{}", "=".repeat(60));
            println!("  Families: {}", report.families);
            println!(
                "  Genes found: {}/{}",
                report.found_genes, report.target_genes
            );
            if report.missing_genes > 0 {
                println!("  Genes missing: {}", report.missing_genes);
                if verbose {
                    for id in &report.missing_sample {
                        println!("    {id}");
                    }
                }
            }
            println!("  Files created: {}", report.files_created);
            println!("  Families skipped (no genes): {}", report.families_skipped);
            println!("  Records written: {}", report.records_written);
            println!("  Output directory: {}", report.output_dir);
        }
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Tsv => {
            println!("families\tfound_genes\tmissing_genes\tfiles_created\tfamilies_skipped\trecords_written");
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                report.families,
                report.found_genes,
                report.missing_genes,
                report.files_created,
                report.families_skipped,
                report.records_written
            );
        }
    }

    Ok(())
}
