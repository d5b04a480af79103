//! Parsers for the pipeline's text inputs.
//!
//! This module provides parsers for:
//!
//! - **Clustering tables**: two-column `representative<TAB>member` rows from MMseqs2
//! - **Gene-level ortholog tables**: `family_id\tgenome\tgene_id` rows written by
//!   [`crate::output::results`]
//! - **Genes-for-alignment artifacts**: `Family:` blocks listing member gene ids
//! - **FASTA collections**: streaming extraction of selected sequences
//!
//! ## Example
//!
//! ```rust,no_run
//! use orthotree::core::ClusterSet;
//! use orthotree::parsing::tsv::read_cluster_pairs;
//! use std::path::Path;
//!
//! let pairs = read_cluster_pairs(Path::new("all_clusters_mmseqs.tsv")).unwrap();
//! let clusters = ClusterSet::from_pairs(pairs);
//! ```

use thiserror::Error;

pub mod fasta;
pub mod genes;
pub mod tsv;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),
}
