use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::config::PipelineConfig;
use crate::tools::astral::build_supertree;

#[derive(Args)]
pub struct SupertreeArgs {
    /// Combined gene trees file
    #[arg(short, long, default_value = "results/all_trees.tree")]
    pub input: PathBuf,

    /// Supertree in Newick format
    #[arg(short, long, default_value = "trees_nwk/supertree.nwk")]
    pub output: PathBuf,

    /// ASTRAL jar (run through java instead of the `astral` executable)
    #[arg(long)]
    pub astral_jar: Option<PathBuf>,
}

/// Execute supertree subcommand
///
/// # Errors
///
/// Returns an error if the trees file is missing or empty, or ASTRAL fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: SupertreeArgs,
    config: &PipelineConfig,
    format: OutputFormat,
    _verbose: bool,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(jar) = args.astral_jar {
        config.astral_jar = Some(jar);
    }

    let trees = build_supertree(&args.input, &args.output, &config)
        .with_context(|| format!("Failed to build supertree from {}", args.input.display()))?;

    match format {
        OutputFormat::Text => {
            println!("Supertree built from {trees} gene trees");
            println!("  Output: {}", args.output.display());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "input": args.input.display().to_string(),
                "gene_trees": trees,
                "supertree": args.output.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("input\tgene_trees\tsupertree");
            println!("{}\t{trees}\t{}", args.input.display(), args.output.display());
        }
    }
    Ok(())
}
