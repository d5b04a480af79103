use std::collections::BTreeSet;

use serde::Serialize;

/// A cluster accepted as a single-copy ortholog family.
///
/// Only [`crate::orthology::classifier::classify`] builds these, so every
/// instance satisfies `members.len() == genomes.len() >= min_genomes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrthologFamily {
    representative: String,
    members: BTreeSet<String>,
    genomes: BTreeSet<String>,
}

impl OrthologFamily {
    pub(crate) fn new(
        representative: String,
        members: BTreeSet<String>,
        genomes: BTreeSet<String>,
    ) -> Self {
        debug_assert_eq!(members.len(), genomes.len());
        Self {
            representative,
            members,
            genomes,
        }
    }

    #[must_use]
    pub fn representative(&self) -> &str {
        &self.representative
    }

    #[must_use]
    pub fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    /// Genomes covered, sorted lexicographically
    #[must_use]
    pub fn genomes(&self) -> &BTreeSet<String> {
        &self.genomes
    }

    #[must_use]
    pub fn genome_count(&self) -> usize {
        self.genomes.len()
    }

    /// Descriptor as persisted in the genes-for-alignment artifact
    #[must_use]
    pub fn descriptor(&self) -> FamilyDescriptor {
        FamilyDescriptor {
            representative: self.representative.clone(),
            genome_count: self.genome_count(),
            members: self.members.iter().cloned().collect(),
        }
    }
}

/// Family membership as re-read from the genes-for-alignment artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyDescriptor {
    pub representative: String,

    /// Genome count declared in the `Family:` header line
    pub genome_count: usize,

    /// Member gene ids, in file order
    pub members: Vec<String>,
}

impl FamilyDescriptor {
    pub fn new(representative: impl Into<String>, genome_count: usize) -> Self {
        Self {
            representative: representative.into(),
            genome_count,
            members: Vec::new(),
        }
    }
}
