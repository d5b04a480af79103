//! # orthotree
//!
//! A library for resolving single-copy ortholog families across bacterial
//! genomes and driving the comparative-genomics tools that turn them into a
//! species tree.
//!
//! Proteins are named `<Genus>_<species>_<protein id>`, so the genome of any
//! gene can be recovered from its id alone. After all-vs-all clustering, a
//! cluster becomes an ortholog family when every member comes from a
//! different genome and enough genomes are covered. Families are then
//! written out, their sequences extracted, aligned, and turned into trees.
//!
//! ## Features
//!
//! - **Genome derivation**: `Escherichia_coli_WP_000001.1` -> `Escherichia_coli`
//! - **Single-copy filtering**: Rejects clusters with in-paralogs or too few genomes
//! - **Streaming extraction**: One pass over large, optionally gzipped, proteome files
//! - **Parallel tool runs**: MAFFT and FastTree units run on a rayon pool, failures isolated
//!
//! ## Example
//!
//! ```rust
//! use orthotree::core::ClusterSet;
//! use orthotree::orthology::classify_all;
//!
//! let clusters = ClusterSet::from_pairs(vec![
//!     ("Escherichia_coli_WP1", "Escherichia_coli_WP1"),
//!     ("Escherichia_coli_WP1", "Salmonella_enterica_WP2"),
//!     ("Escherichia_coli_WP1", "Shigella_flexneri_WP3"),
//! ]);
//!
//! let (families, summary) = classify_all(&clusters.into_clusters(), 3);
//! assert_eq!(summary.accepted, 1);
//! assert_eq!(families[0].genome_count(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Clusters, ortholog families and genome derivation
//! - [`orthology`]: Single-copy ortholog classification
//! - [`parsing`]: Readers for cluster tables, gene lists and FASTA
//! - [`output`]: Result tables and per-family FASTA files
//! - [`tools`]: MMseqs2, MAFFT, FastTree, IQ-TREE and ASTRAL runners
//! - [`download`]: Proteome retrieval from NCBI
//! - [`config`]: Pipeline configuration
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod download;
pub mod orthology;
pub mod output;
pub mod parsing;
pub mod tools;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::PipelineConfig;
pub use core::cluster::{Cluster, ClusterSet};
pub use core::family::{FamilyDescriptor, OrthologFamily};
pub use core::genome::genome_of;
pub use orthology::{classify, classify_all, ClassificationSummary};
