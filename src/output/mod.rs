//! Writers for resolved ortholog families.
//!
//! - [`results`]: the gene-level table, family composition table,
//!   representative list, and genes-for-alignment artifact
//! - [`family_fasta`]: one FASTA per family for the alignment stage

pub mod family_fasta;
pub mod results;
