use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::config::PipelineConfig;
use crate::tools::iqtree::build_consensus;

#[derive(Args)]
pub struct ConsensusArgs {
    /// Combined gene trees file
    #[arg(short, long, default_value = "results/all_trees.tree")]
    pub input: PathBuf,

    /// Consensus tree in Newick format
    #[arg(short, long, default_value = "trees_nwk/greedy_consensus.nwk")]
    pub output: PathBuf,
}

/// Execute consensus subcommand
///
/// # Errors
///
/// Returns an error if the trees file is missing or IQ-TREE fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ConsensusArgs,
    config: &PipelineConfig,
    format: OutputFormat,
    _verbose: bool,
) -> anyhow::Result<()> {
    let tree = build_consensus(&args.input, &args.output, config)
        .with_context(|| format!("Failed to build consensus from {}", args.input.display()))?;

    match format {
        OutputFormat::Text => println!("Greedy consensus tree: {}", tree.display()),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "input": args.input.display().to_string(),
                "consensus_tree": tree.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("input\tconsensus_tree");
            println!("{}\t{}", args.input.display(), tree.display());
        }
    }
    Ok(())
}
