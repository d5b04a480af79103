//! Single-copy ortholog classification.
//!
//! A cluster becomes an [`OrthologFamily`](crate::core::OrthologFamily) when:
//!
//! 1. every genome contributes exactly one member,
//! 2. at least `min_genomes` distinct genomes are present,
//! 3. the member count equals the distinct genome count.
//!
//! Clusters are independent of each other, so a batch is classified in
//! parallel with [`classifier::classify_all`].

pub mod classifier;

pub use classifier::{classify, classify_all, evaluate, ClassificationSummary, Rejection};
