use std::collections::{BTreeSet, HashMap};

/// A representative gene plus the set of genes clustered with it.
///
/// The representative is not required to appear among the members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub representative: String,
    pub members: BTreeSet<String>,
}

impl Cluster {
    pub fn new(representative: impl Into<String>) -> Self {
        Self {
            representative: representative.into(),
            members: BTreeSet::new(),
        }
    }

    /// Add a member, returning false if it was already present
    pub fn insert(&mut self, member: impl Into<String>) -> bool {
        self.members.insert(member.into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Clusters keyed by representative, iterated in the order representatives
/// were first seen.
#[derive(Debug, Default)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,

    /// Index: representative -> position in `clusters`
    rep_to_index: HashMap<String, usize>,
}

impl ClusterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Group pairwise `(representative, member)` rows into clusters.
    ///
    /// Duplicate rows are idempotent and an empty input gives an empty set.
    pub fn from_pairs<I, R, M>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, M)>,
        R: Into<String>,
        M: Into<String>,
    {
        let mut set = Self::new();
        for (rep, member) in pairs {
            set.add_pair(rep, member);
        }
        set
    }

    pub fn add_pair(&mut self, representative: impl Into<String>, member: impl Into<String>) {
        let representative = representative.into();
        let idx = if let Some(&idx) = self.rep_to_index.get(&representative) {
            idx
        } else {
            let idx = self.clusters.len();
            self.rep_to_index.insert(representative.clone(), idx);
            self.clusters.push(Cluster::new(representative));
            idx
        };
        self.clusters[idx].insert(member);
    }

    #[must_use]
    pub fn get(&self, representative: &str) -> Option<&Cluster> {
        self.rep_to_index
            .get(representative)
            .map(|&idx| &self.clusters[idx])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    /// Total number of distinct (representative, member) relations
    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    #[must_use]
    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }
}

impl IntoIterator for ClusterSet {
    type Item = Cluster;
    type IntoIter = std::vec::IntoIter<Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let set = ClusterSet::from_pairs(Vec::<(String, String)>::new());
        assert!(set.is_empty());
        assert_eq!(set.relation_count(), 0);
    }

    #[test]
    fn test_duplicate_rows_are_idempotent() {
        let once = ClusterSet::from_pairs([("R", "M")]);
        let thrice = ClusterSet::from_pairs([("R", "M"), ("R", "M"), ("R", "M")]);

        assert_eq!(once.len(), 1);
        assert_eq!(thrice.len(), 1);
        assert_eq!(once.get("R"), thrice.get("R"));
        assert_eq!(thrice.get("R").unwrap().len(), 1);
    }

    #[test]
    fn test_encounter_order_of_representatives() {
        let set = ClusterSet::from_pairs([
            ("R2", "b"),
            ("R1", "a"),
            ("R2", "c"),
            ("R3", "d"),
            ("R1", "e"),
        ]);

        let reps: Vec<&str> = set.iter().map(|c| c.representative.as_str()).collect();
        assert_eq!(reps, vec!["R2", "R1", "R3"]);
        assert_eq!(set.get("R1").unwrap().len(), 2);
        assert_eq!(set.get("R2").unwrap().len(), 2);
        assert_eq!(set.relation_count(), 5);
    }

    #[test]
    fn test_representative_need_not_be_member() {
        let set = ClusterSet::from_pairs([("R1", "Ecoli_A_1")]);
        let cluster = set.get("R1").unwrap();
        assert!(!cluster.members.contains("R1"));
        assert!(set.get("Ecoli_A_1").is_none());
    }
}
