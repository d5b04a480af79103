use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::align::print_batch;
use crate::cli::{print_json, OutputFormat};
use crate::config::PipelineConfig;
use crate::tools::fasttree::build_gene_trees;

#[derive(Args)]
pub struct TreesArgs {
    /// Directory of aligned family files
    #[arg(short, long, default_value = "results/alignments")]
    pub input_dir: PathBuf,

    /// Combined trees file, one Newick tree per line
    #[arg(short, long, default_value = "results/all_trees.tree")]
    pub output: PathBuf,
}

/// Execute trees subcommand
///
/// # Errors
///
/// Returns an error if there are no alignments or the trees cannot be
/// combined.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: TreesArgs,
    config: &PipelineConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let summary = build_gene_trees(&args.input_dir, &args.output, config)
        .with_context(|| format!("Failed to build trees from {}", args.input_dir.display()))?;

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text | OutputFormat::Tsv => {
            print_batch("Gene Trees", &summary.batch, format, verbose)?;
            if matches!(format, OutputFormat::Text) {
                println!(
                    "  Combined {} trees into {}",
                    summary.combined,
                    summary.output.display()
                );
            }
        }
    }
    Ok(())
}
