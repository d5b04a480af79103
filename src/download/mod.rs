//! Proteome retrieval from NCBI.
//!
//! For each organism the latest RefSeq complete genome assembly is located
//! through Entrez (falling back to any complete genome), its
//! `_protein.faa.gz` is streamed from the NCBI FTP mirror over HTTPS, and
//! every record is renamed to `<Genus_species>_<protein id>` so the genome
//! can later be recovered from the gene id alone.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use noodles::fasta;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::PipelineConfig;

pub mod ncbi;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No complete genome found for '{0}'")]
    NoAssembly(String),

    #[error("No FTP path available for assembly {0}")]
    NoFtpPath(String),

    #[error("Unexpected Entrez response: {0}")]
    Entrez(String),

    #[error("Failed to parse proteome: {0}")]
    Fasta(String),

    #[error("No organisms listed in {0}")]
    NoOrganisms(String),
}

/// Outcome of a download run
#[derive(Debug, Default, Serialize)]
pub struct DownloadSummary {
    pub organisms: usize,
    pub downloaded: usize,
    pub failed: Vec<String>,
    pub proteins: usize,
}

/// Organism names, one per line, blank lines ignored
///
/// # Errors
///
/// Returns an IO error if the file cannot be read.
pub fn read_organisms(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// `Escherichia coli` -> `Escherichia_coli`
#[must_use]
pub fn species_prefix(organism: &str) -> String {
    organism.replace(' ', "_")
}

/// Copy proteome records from `reader` to `out`, renaming each record to
/// `>{prefix}_{id}` and writing its sequence on a single line. Records with
/// an empty sequence are dropped. Returns the number of records written.
///
/// # Errors
///
/// Returns `DownloadError::Fasta` if the input cannot be parsed, or an IO
/// error if writing fails.
pub fn rewrite_proteome<R: BufRead, W: Write>(
    reader: R,
    prefix: &str,
    out: &mut W,
) -> Result<usize, DownloadError> {
    let mut reader = fasta::io::Reader::new(reader);
    let mut written = 0;

    for result in reader.records() {
        let record = result.map_err(|e| DownloadError::Fasta(e.to_string()))?;
        let sequence: &[u8] = record.sequence().as_ref();
        if sequence.is_empty() {
            continue;
        }

        let id = String::from_utf8_lossy(record.name());
        writeln!(out, ">{prefix}_{id}")?;
        out.write_all(sequence)?;
        writeln!(out)?;
        written += 1;
    }

    Ok(written)
}

/// Download the proteomes of every organism in `organisms_file` into a single
/// FASTA at `output`.
///
/// Organisms that cannot be resolved or fetched are logged and skipped.
///
/// # Errors
///
/// Returns an error if the organism list cannot be read or is empty, the
/// HTTP client cannot be built, or the output cannot be written.
pub fn download_proteomes(
    organisms_file: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<DownloadSummary, DownloadError> {
    let organisms = read_organisms(organisms_file)?;
    if organisms.is_empty() {
        return Err(DownloadError::NoOrganisms(
            organisms_file.display().to_string(),
        ));
    }
    info!("Found {} organisms to process", organisms.len());

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(output)?);

    let client = ncbi::EntrezClient::new(config)?;
    let mut summary = DownloadSummary {
        organisms: organisms.len(),
        ..DownloadSummary::default()
    };

    for (i, organism) in organisms.iter().enumerate() {
        info!("[{}/{}] Processing: {organism}", i + 1, organisms.len());

        match client.fetch_proteome(organism, &mut out) {
            Ok(count) => {
                info!("Downloaded: {count} proteins");
                summary.downloaded += 1;
                summary.proteins += count;
            }
            Err(e) => {
                error!("{organism}: {e}");
                summary.failed.push(organism.clone());
            }
        }

        if i + 1 < organisms.len() && config.request_delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(config.request_delay_ms));
        }
    }

    out.flush()?;
    if !summary.failed.is_empty() {
        warn!(
            "{} organisms could not be downloaded",
            summary.failed.len()
        );
    }
    info!("Proteomes saved to: {}", output.display());

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_proteome() {
        let input = ">WP_000001.1 hypothetical protein [Escherichia coli]\nMKV\nLLA\n\
                     >WP_000002.1 empty\n>WP_000003.1\nMSS\n";
        let mut out = Vec::new();
        let n = rewrite_proteome(input.as_bytes(), "Escherichia_coli", &mut out).unwrap();

        assert_eq!(n, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            ">Escherichia_coli_WP_000001.1\nMKVLLA\n>Escherichia_coli_WP_000003.1\nMSS\n"
        );
    }

    #[test]
    fn test_rewritten_ids_carry_genome() {
        use crate::core::genome::genome_of;

        let mut out = Vec::new();
        rewrite_proteome(
            ">YCN68545.1\nM\n".as_bytes(),
            &species_prefix("Escherichia coli"),
            &mut out,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        let id = text.lines().next().unwrap().trim_start_matches('>');
        assert_eq!(genome_of(id), "Escherichia_coli");
    }

    #[test]
    fn test_read_organisms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chosen_bacteria.txt");
        std::fs::write(&path, "Escherichia coli\n\n  Salmonella enterica  \n").unwrap();
        assert_eq!(
            read_organisms(&path).unwrap(),
            vec!["Escherichia coli", "Salmonella enterica"]
        );
    }

    #[test]
    fn test_empty_organism_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("organisms.txt");
        std::fs::write(&path, "\n").unwrap();
        let err = download_proteomes(
            &path,
            &dir.path().join("out.fasta"),
            &PipelineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DownloadError::NoOrganisms(_)));
    }
}
