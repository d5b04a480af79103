//! Per-family FASTA files for the alignment stage.
//!
//! Each family `i` (1-based, in input order) becomes `family_{i:04}.fasta`:
//!
//! ```text
//! #Family_1|Species:3
//! >Escherichia_coli
//! MKVLLA...
//! >Salmonella_enterica
//! MKVLIA...
//! ```
//!
//! Record names are the species display name derived from the gene id, so
//! the downstream gene trees share leaf labels across families.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::core::family::FamilyDescriptor;
use crate::core::genome::genome_of;

/// Summary of one build over a family list
#[derive(Debug, Default, Serialize)]
pub struct FamilyFastaSummary {
    /// Files written, in family order
    pub created: Vec<PathBuf>,

    /// Families dropped because none of their members had a sequence
    pub skipped_no_genes: usize,

    /// Sequence records written across all files
    pub records_written: usize,

    /// Member ids that had no sequence
    pub missing_members: usize,
}

enum FamilyOutcome {
    Written { path: PathBuf, records: usize, missing: usize },
    Skipped { missing: usize },
}

#[must_use]
pub fn family_fasta_name(index: usize) -> String {
    format!("family_{index:04}.fasta")
}

/// Write one FASTA per family into `output_dir`.
///
/// Members without a sequence are skipped with a warning. A family with no
/// written records has its file removed and is counted in
/// `skipped_no_genes`.
///
/// # Errors
///
/// Returns an IO error if the directory or any file cannot be created,
/// written, or removed.
pub fn write_family_fastas(
    families: &[FamilyDescriptor],
    sequences: &HashMap<String, String>,
    output_dir: &Path,
) -> std::io::Result<FamilyFastaSummary> {
    std::fs::create_dir_all(output_dir)?;

    let outcomes: Vec<FamilyOutcome> = families
        .par_iter()
        .enumerate()
        .map(|(i, family)| write_family(i + 1, family, sequences, output_dir))
        .collect::<std::io::Result<_>>()?;

    let mut summary = FamilyFastaSummary::default();
    for outcome in outcomes {
        match outcome {
            FamilyOutcome::Written {
                path,
                records,
                missing,
            } => {
                summary.created.push(path);
                summary.records_written += records;
                summary.missing_members += missing;
            }
            FamilyOutcome::Skipped { missing } => {
                summary.skipped_no_genes += 1;
                summary.missing_members += missing;
            }
        }
    }

    info!(
        "Saved {} family FASTA files to: {}",
        summary.created.len(),
        output_dir.display()
    );
    if summary.skipped_no_genes > 0 {
        info!(
            "({} families skipped - no genes found)",
            summary.skipped_no_genes
        );
    }

    Ok(summary)
}

fn write_family(
    index: usize,
    family: &FamilyDescriptor,
    sequences: &HashMap<String, String>,
    output_dir: &Path,
) -> std::io::Result<FamilyOutcome> {
    let path = output_dir.join(family_fasta_name(index));
    let mut out = BufWriter::new(File::create(&path)?);

    writeln!(out, "#Family_{index}|Species:{}", family.genome_count)?;

    let mut records = 0;
    let mut missing = 0;
    for gene in &family.members {
        if let Some(sequence) = sequences.get(gene) {
            writeln!(out, ">{}", genome_of(gene))?;
            writeln!(out, "{sequence}")?;
            records += 1;
        } else {
            warn!("Missing sequence for {gene} in family {index}");
            missing += 1;
        }
    }
    out.flush()?;
    drop(out);

    if records == 0 {
        warn!("No sequences written for family {index}, removing file");
        std::fs::remove_file(&path)?;
        return Ok(FamilyOutcome::Skipped { missing });
    }

    Ok(FamilyOutcome::Written {
        path,
        records,
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(rep: &str, count: usize, members: &[&str]) -> FamilyDescriptor {
        let mut d = FamilyDescriptor::new(rep, count);
        d.members = members.iter().map(|s| (*s).to_string()).collect();
        d
    }

    fn sequences(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_family_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let families = vec![descriptor(
            "R1",
            2,
            &["Escherichia_coli_WP_1.1", "Salmonella_enterica_WP_2.1"],
        )];
        let seqs = sequences(&[
            ("Escherichia_coli_WP_1.1", "MKV"),
            ("Salmonella_enterica_WP_2.1", "MKI"),
        ]);

        let summary = write_family_fastas(&families, &seqs, dir.path()).unwrap();
        assert_eq!(summary.created, vec![dir.path().join("family_0001.fasta")]);

        let content = std::fs::read_to_string(&summary.created[0]).unwrap();
        assert_eq!(
            content,
            "#Family_1|Species:2\n>Escherichia_coli\nMKV\n>Salmonella_enterica\nMKI\n"
        );
    }

    #[test]
    fn test_missing_members_and_empty_family() {
        let dir = tempfile::tempdir().unwrap();
        let families = vec![
            descriptor("R1", 3, &["A_a_1", "B_b_1", "C_c_1"]),
            descriptor("R2", 2, &["D_d_1", "E_e_1"]),
            descriptor("R3", 1, &["A_a_2"]),
        ];
        let seqs = sequences(&[("A_a_1", "M"), ("C_c_1", "MM"), ("A_a_2", "MMM")]);

        let summary = write_family_fastas(&families, &seqs, dir.path()).unwrap();

        assert_eq!(summary.skipped_no_genes, 1);
        assert_eq!(summary.missing_members, 3);
        assert_eq!(
            summary.created,
            vec![
                dir.path().join("family_0001.fasta"),
                dir.path().join("family_0003.fasta"),
            ]
        );
        assert!(!dir.path().join("family_0002.fasta").exists());

        // Records written equals the (family, member) pairs with a sequence
        let present = families
            .iter()
            .flat_map(|f| f.members.iter())
            .filter(|g| seqs.contains_key(*g))
            .count();
        assert_eq!(summary.records_written, present);

        let on_disk: usize = summary
            .created
            .iter()
            .map(|p| {
                std::fs::read_to_string(p)
                    .unwrap()
                    .lines()
                    .filter(|l| l.starts_with('>'))
                    .count()
            })
            .sum();
        assert_eq!(on_disk, present);
    }

    #[test]
    fn test_no_families() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("family_fastas");
        let summary = write_family_fastas(&[], &HashMap::new(), &out).unwrap();
        assert!(summary.created.is_empty());
        assert!(out.is_dir());
    }

    #[test]
    fn test_family_fasta_name() {
        assert_eq!(family_fasta_name(1), "family_0001.fasta");
        assert_eq!(family_fasta_name(12345), "family_12345.fasta");
    }
}
