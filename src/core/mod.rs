//! Core data types for ortholog family resolution.
//!
//! - [`genome`]: genome naming derived from gene identifiers
//! - [`Cluster`] / [`ClusterSet`]: representative -> member groupings from the clustering tool
//! - [`OrthologFamily`]: a cluster accepted as single-copy across genomes
//! - [`FamilyDescriptor`]: a family as persisted for sequence extraction
//!
//! ## Gene identifiers
//!
//! Gene ids carry their genome as a structural prefix:
//!
//! | Gene id | Genome |
//! |---------|--------|
//! | `Escherichia_coli_WP_000001.1` | `Escherichia_coli` |
//! | `Escherichia_coli` | `Escherichia_coli` |
//! | `R1` | `R1` |

pub mod cluster;
pub mod family;
pub mod genome;

pub use cluster::{Cluster, ClusterSet};
pub use family::{FamilyDescriptor, OrthologFamily};
