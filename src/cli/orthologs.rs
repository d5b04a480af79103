use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{print_json, OutputFormat};
use crate::config::PipelineConfig;
use crate::core::cluster::ClusterSet;
use crate::orthology::{classify_all, ClassificationSummary};
use crate::output::results::{save_genes_for_alignment, save_results, ResultPaths};
use crate::parsing::tsv::read_cluster_pairs;

#[derive(Args)]
pub struct OrthologsArgs {
    /// MMseqs2 cluster table (representative<TAB>member)
    #[arg(short, long, default_value = "results/all_clusters_mmseqs.tsv")]
    pub input: PathBuf,

    /// Prefix for the result tables
    #[arg(short, long, default_value = "results/orthologs")]
    pub output_prefix: PathBuf,

    /// Minimum number of genomes a family must cover
    #[arg(short = 'm', long)]
    pub min_genomes: Option<usize>,

    /// Gene list consumed by `extract`
    #[arg(short, long, default_value = "results/all_genes_for_alignment.txt")]
    pub genes_output: PathBuf,
}

#[derive(serde::Serialize)]
struct OrthologsReport<'a> {
    input: String,
    min_genomes: usize,
    relations: usize,
    classification: &'a ClassificationSummary,
    outputs: &'a ResultPaths,
    genes_for_alignment: String,
}

/// Execute orthologs subcommand
///
/// # Errors
///
/// Returns an error if the cluster table cannot be read or the results
/// cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: OrthologsArgs,
    config: &PipelineConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let min_genomes = args.min_genomes.unwrap_or(config.min_genomes);

    info!("Loading clusters from {}", args.input.display());
    let pairs = read_cluster_pairs(&args.input)
        .with_context(|| format!("Failed to read clusters from {}", args.input.display()))?;
    let relations = pairs.len();
    let clusters = ClusterSet::from_pairs(pairs);
    info!(
        "Loaded {} clusters from {relations} rows ({} distinct relations)",
        clusters.len(),
        clusters.relation_count()
    );

    info!("Identifying single-copy orthologs in at least {min_genomes} genomes...");
    let clusters = clusters.into_clusters();
    let (families, summary) = classify_all(&clusters, min_genomes);
    info!("Found {} ortholog families", families.len());

    let outputs = save_results(&args.output_prefix, &families).with_context(|| {
        format!("Failed to write results to {}", args.output_prefix.display())
    })?;
    save_genes_for_alignment(&args.genes_output, &families).with_context(|| {
        format!("Failed to write gene list to {}", args.genes_output.display())
    })?;

    match format {
        OutputFormat::Text => {
            println!("Ortholog Identification");
            println!("{}", "=".repeat(60));
            println!("  Clusters: {}", summary.clusters);
            println!("  Minimum genomes: {min_genomes}");
            println!("  Accepted families: {}", summary.accepted);
            println!("  Rejected clusters: {}", summary.rejected);
            if verbose {
                println!("    with duplicated genomes: {}", summary.duplicated_genome);
                println!("    below minimum genomes: {}", summary.below_min_genomes);
            }
            println!("\nOutputs:");
            println!("  {}", outputs.gene_table.display());
            println!("  {}", outputs.families.display());
            println!("  {}", outputs.representatives.display());
            println!("  {}", args.genes_output.display());
        }
        OutputFormat::Json => print_json(&OrthologsReport {
            input: args.input.display().to_string(),
            min_genomes,
            relations,
            classification: &summary,
            outputs: &outputs,
            genes_for_alignment: args.genes_output.display().to_string(),
        })?,
        OutputFormat::Tsv => {
            println!("clusters\taccepted\trejected\tduplicated_genome\tbelow_min_genomes");
            println!(
                "{}\t{}\t{}\t{}\t{}",
                summary.clusters,
                summary.accepted,
                summary.rejected,
                summary.duplicated_genome,
                summary.below_min_genomes
            );
        }
    }

    Ok(())
}
