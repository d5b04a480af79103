//! Command-line interface for orthotree.
//!
//! This module implements the CLI using clap. Each pipeline stage is a
//! subcommand:
//!
//! - **download**: Fetch proteomes for a list of organisms from NCBI
//! - **cluster**: Cluster all proteins with MMseqs2
//! - **orthologs**: Keep single-copy clusters spanning enough genomes
//! - **extract**: Write one FASTA per ortholog family
//! - **align**: Align every family with MAFFT
//! - **trees**: Build gene trees with FastTree
//! - **consensus**: Greedy consensus tree with IQ-TREE
//! - **supertree**: Species supertree with ASTRAL
//! - **config**: Show the effective configuration
//!
//! ## Usage
//!
//! ```text
//! # Default layout under results/
//! orthotree download
//! orthotree cluster
//! orthotree orthologs --min-genomes 20
//! orthotree extract
//! orthotree align --threads 8
//! orthotree trees
//! orthotree supertree --astral-jar /opt/astral/astral.5.7.8.jar
//!
//! # JSON summaries for scripting
//! orthotree orthologs -i clusters.tsv -o out/orthologs --format json
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::PipelineConfig;

pub mod align;
pub mod cluster;
pub mod config;
pub mod consensus;
pub mod download;
pub mod extract;
pub mod orthologs;
pub mod supertree;
pub mod trees;

#[derive(Parser)]
#[command(name = "orthotree")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Resolve single-copy ortholog families and build species trees")]
#[command(
    long_about = "orthotree runs a comparative-genomics workflow from proteomes to a species tree.\n\nIt clusters proteins across genomes, keeps clusters that hold exactly one gene from each of enough genomes, and drives the alignment and tree-building tools over the resulting families:\n- MMseqs2 for clustering\n- MAFFT for alignment\n- FastTree, IQ-TREE and ASTRAL for trees"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Worker threads (overrides the configuration)
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download proteomes from NCBI
    Download(download::DownloadArgs),

    /// Cluster proteins with MMseqs2
    Cluster(cluster::ClusterArgs),

    /// Identify single-copy ortholog families
    Orthologs(orthologs::OrthologsArgs),

    /// Extract family sequences into per-family FASTA files
    Extract(extract::ExtractArgs),

    /// Align family FASTA files with MAFFT
    Align(align::AlignArgs),

    /// Build gene trees with FastTree
    Trees(trees::TreesArgs),

    /// Build a greedy consensus tree with IQ-TREE
    Consensus(consensus::ConsensusArgs),

    /// Build a species supertree with ASTRAL
    Supertree(supertree::SupertreeArgs),

    /// Print the effective configuration
    Config,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load the configuration file if given, apply `--threads`, and validate.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the resulting
/// configuration is invalid.
pub fn load_config(path: Option<&Path>, threads: Option<usize>) -> anyhow::Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => PipelineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(threads) = threads {
        config.threads = threads;
    }

    config.validate()?;
    Ok(config)
}

/// Print a serializable summary as pretty JSON
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_threads_override() {
        let config = load_config(None, Some(12)).unwrap();
        assert_eq!(config.threads, 12);
        assert_eq!(config.min_genomes, crate::config::DEFAULT_MIN_GENOMES);
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(load_config(None, Some(0)).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "orthotree",
            "orthologs",
            "--min-genomes",
            "3",
            "--format",
            "json",
            "-t",
            "2",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.threads, Some(2));
        match cli.command {
            Commands::Orthologs(args) => assert_eq!(args.min_genomes, Some(3)),
            _ => panic!("expected orthologs"),
        }
    }
}
