use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::core::family::OrthologFamily;
use crate::core::genome::genome_of;
use crate::parsing::genes::FAMILY_PREFIX;
use crate::parsing::tsv::GENE_TABLE_HEADER;

pub const FAMILIES_HEADER: &str = "family_id\tgenomes";

/// Paths of the relational outputs for one output prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPaths {
    pub gene_table: PathBuf,
    pub families: PathBuf,
    pub representatives: PathBuf,
}

impl ResultPaths {
    /// `<prefix>_1_1.tsv`, `<prefix>_families.tsv`, `<prefix>_representatives.txt`
    #[must_use]
    pub fn from_prefix(prefix: &Path) -> Self {
        let with_suffix = |suffix: &str| {
            let mut s = prefix.as_os_str().to_owned();
            s.push(suffix);
            PathBuf::from(s)
        };

        Self {
            gene_table: with_suffix("_1_1.tsv"),
            families: with_suffix("_families.tsv"),
            representatives: with_suffix("_representatives.txt"),
        }
    }
}

/// One row per (family, genome, gene) triple
///
/// # Errors
///
/// Returns an IO error if writing fails.
pub fn write_gene_table<W: Write>(out: &mut W, families: &[OrthologFamily]) -> std::io::Result<()> {
    writeln!(out, "{GENE_TABLE_HEADER}")?;
    for family in families {
        for gene in family.members() {
            writeln!(
                out,
                "{}\t{}\t{}",
                family.representative(),
                genome_of(gene),
                gene
            )?;
        }
    }
    Ok(())
}

/// One row per family with its genomes comma-joined in sorted order
///
/// # Errors
///
/// Returns an IO error if writing fails.
pub fn write_family_table<W: Write>(
    out: &mut W,
    families: &[OrthologFamily],
) -> std::io::Result<()> {
    writeln!(out, "{FAMILIES_HEADER}")?;
    for family in families {
        // BTreeSet iteration is already lexicographic
        let genomes: Vec<&str> = family.genomes().iter().map(String::as_str).collect();
        writeln!(out, "{}\t{}", family.representative(), genomes.join(","))?;
    }
    Ok(())
}

/// # Errors
///
/// Returns an IO error if writing fails.
pub fn write_representatives<W: Write>(
    out: &mut W,
    families: &[OrthologFamily],
) -> std::io::Result<()> {
    for family in families {
        writeln!(out, "{}", family.representative())?;
    }
    Ok(())
}

/// Write the genes-for-alignment artifact: one `Family:` block per family,
/// each followed by a blank line.
///
/// # Errors
///
/// Returns an IO error if writing fails.
pub fn write_genes_for_alignment<W: Write>(
    out: &mut W,
    families: &[OrthologFamily],
) -> std::io::Result<()> {
    for family in families {
        writeln!(
            out,
            "{FAMILY_PREFIX} {} ({} species)",
            family.representative(),
            family.genome_count()
        )?;
        for gene in family.members() {
            writeln!(out, "{gene}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_file<F>(path: &Path, families: &[OrthologFamily], write: F) -> std::io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>, &[OrthologFamily]) -> std::io::Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    write(&mut out, families)?;
    out.flush()
}

/// Write the three relational outputs for `prefix`.
///
/// # Errors
///
/// Returns an IO error if any file cannot be created or written.
pub fn save_results(prefix: &Path, families: &[OrthologFamily]) -> std::io::Result<ResultPaths> {
    let paths = ResultPaths::from_prefix(prefix);

    write_file(&paths.gene_table, families, write_gene_table)?;
    write_file(&paths.families, families, write_family_table)?;
    write_file(&paths.representatives, families, write_representatives)?;

    info!(
        "Saved results: {}, {}, {}",
        paths.gene_table.display(),
        paths.families.display(),
        paths.representatives.display()
    );

    Ok(paths)
}

/// Write the genes-for-alignment artifact to `path`, returning the number of genes written.
///
/// # Errors
///
/// Returns an IO error if the file cannot be created or written.
pub fn save_genes_for_alignment(path: &Path, families: &[OrthologFamily]) -> std::io::Result<usize> {
    write_file(path, families, write_genes_for_alignment)?;

    let total_genes: usize = families.iter().map(|f| f.members().len()).sum();
    info!(
        "Saved {total_genes} genes from {} families to: {}",
        families.len(),
        path.display()
    );
    Ok(total_genes)
}
