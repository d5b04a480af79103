use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::core::cluster::Cluster;
use crate::core::family::OrthologFamily;
use crate::core::genome::genome_of;

/// Why a cluster was not accepted. Several flags may be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Some genome contributes more than one member (in-paralogs)
    pub duplicated_genome: bool,

    /// Fewer distinct genomes than the configured minimum
    pub below_min_genomes: bool,

    /// Member count differs from distinct genome count
    pub member_genome_mismatch: bool,
}

/// Per-genome member tally for one cluster
fn genome_counts(cluster: &Cluster) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for member in &cluster.members {
        *counts.entry(genome_of(member)).or_insert(0) += 1;
    }
    counts
}

/// Evaluate a cluster against the single-copy ortholog criteria.
///
/// A cluster is accepted iff every genome occurs exactly once among its
/// members, at least `min_genomes` distinct genomes are present, and the
/// member count equals the distinct genome count.
///
/// # Errors
///
/// Returns the [`Rejection`] flags when any criterion fails.
pub fn evaluate(cluster: &Cluster, min_genomes: usize) -> Result<OrthologFamily, Rejection> {
    let counts = genome_counts(cluster);

    let rejection = Rejection {
        duplicated_genome: counts.values().any(|&n| n != 1),
        below_min_genomes: counts.len() < min_genomes,
        member_genome_mismatch: cluster.members.len() != counts.len(),
    };

    if rejection.duplicated_genome || rejection.below_min_genomes || rejection.member_genome_mismatch
    {
        return Err(rejection);
    }

    let genomes: BTreeSet<String> = counts.into_keys().map(str::to_string).collect();
    Ok(OrthologFamily::new(
        cluster.representative.clone(),
        cluster.members.clone(),
        genomes,
    ))
}

/// Classify a single cluster, discarding the rejection reason
#[must_use]
pub fn classify(cluster: &Cluster, min_genomes: usize) -> Option<OrthologFamily> {
    evaluate(cluster, min_genomes).ok()
}

/// Aggregate outcome of classifying a batch of clusters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    pub clusters: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub duplicated_genome: usize,
    pub below_min_genomes: usize,
}

/// Classify every cluster independently, preserving input order.
///
/// Work is spread over the current rayon pool.
#[must_use]
pub fn classify_all(
    clusters: &[Cluster],
    min_genomes: usize,
) -> (Vec<OrthologFamily>, ClassificationSummary) {
    let outcomes: Vec<Result<OrthologFamily, Rejection>> = clusters
        .par_iter()
        .map(|cluster| evaluate(cluster, min_genomes))
        .collect();

    let mut summary = ClassificationSummary {
        clusters: clusters.len(),
        ..ClassificationSummary::default()
    };
    let mut families = Vec::new();

    for outcome in outcomes {
        match outcome {
            Ok(family) => {
                summary.accepted += 1;
                families.push(family);
            }
            Err(rejection) => {
                summary.rejected += 1;
                if rejection.duplicated_genome {
                    summary.duplicated_genome += 1;
                }
                if rejection.below_min_genomes {
                    summary.below_min_genomes += 1;
                }
            }
        }
    }

    debug!(
        "Classified {} clusters: {} accepted, {} rejected ({} with duplicated genomes, {} below minimum)",
        summary.clusters,
        summary.accepted,
        summary.rejected,
        summary.duplicated_genome,
        summary.below_min_genomes
    );

    (families, summary)
}
