//! Streaming extraction of selected sequences from FASTA collections using noodles.
//!
//! The proteome collection can hold millions of records, so it is read in a
//! single forward pass: only the current record's residues and the sequences
//! already selected are held in memory.
//!
//! Supported inputs:
//! - `.fa`, `.fasta`, `.faa`, `.fna` (uncompressed)
//! - any of the above with `.gz` or `.bgz` (gzip/bgzip compressed)

use std::collections::{BTreeSet, HashMap, HashSet};
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;
use serde::Serialize;
use tracing::{info, warn};

use crate::parsing::ParseError;

/// Number of missing ids listed when reporting an incomplete extraction
pub const MISSING_SAMPLE_SIZE: usize = 5;

/// Check if the path has a FASTA extension (ignoring compression suffixes)
pub fn is_fasta_file(path: &Path) -> bool {
    let stem_path = if is_gzipped(path) {
        Path::new(path.file_stem().unwrap_or_default())
    } else {
        path
    };

    matches!(
        stem_path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "faa" | "fna")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Outcome of a single extraction pass
#[derive(Debug, Default, Serialize)]
pub struct Extraction {
    /// Gene id -> unwrapped residue string
    pub sequences: HashMap<String, String>,

    /// Targets with no record in the collection
    pub missing: BTreeSet<String>,

    /// Records read from the collection, selected or not
    pub records_scanned: usize,
}

impl Extraction {
    #[must_use]
    pub fn found_count(&self) -> usize {
        self.sequences.len()
    }

    /// A bounded, sorted sample of missing ids for reporting
    #[must_use]
    pub fn missing_sample(&self, limit: usize) -> Vec<&str> {
        self.missing.iter().take(limit).map(String::as_str).collect()
    }
}

/// Extract the sequences of `targets` from a FASTA file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened, or
/// `ParseError::Noodles` if the FASTA stream cannot be read.
pub fn extract_sequences(
    path: &Path,
    targets: &HashSet<String>,
) -> Result<Extraction, ParseError> {
    let file = File::open(path)?;

    let extraction = if is_gzipped(path) {
        let reader = BufReader::new(MultiGzDecoder::new(file));
        extract_from_reader(reader, targets)?
    } else {
        extract_from_reader(BufReader::new(file), targets)?
    };

    info!(
        "Extracted {}/{} genes from {} records in {}",
        extraction.found_count(),
        targets.len(),
        extraction.records_scanned,
        path.display()
    );

    Ok(extraction)
}

/// Extract the sequences of `targets` from any buffered FASTA stream.
///
/// A record's id is the first whitespace-delimited token of its `>` definition
/// line. Lines before the first definition line belong to no record and are
/// skipped. All whitespace is removed from selected residues. If an id occurs
/// more than once the last record wins.
///
/// # Errors
///
/// Returns `ParseError::Noodles` if the stream cannot be read.
pub fn extract_from_reader<R: BufRead>(
    reader: R,
    targets: &HashSet<String>,
) -> Result<Extraction, ParseError> {
    let mut reader = fasta::io::Reader::new(reader);
    let mut extraction = Extraction::default();

    let mut definition = String::new();
    let mut residues = Vec::new();

    loop {
        definition.clear();
        let n = reader
            .read_definition(&mut definition)
            .map_err(|e| ParseError::Noodles(format!("Failed to read FASTA definition: {e}")))?;
        if n == 0 {
            break;
        }

        // Residues of unselected records are read into the same scratch
        // buffer and dropped on the next iteration
        residues.clear();
        reader
            .read_sequence(&mut residues)
            .map_err(|e| ParseError::Noodles(format!("Failed to read FASTA sequence: {e}")))?;

        if !definition.starts_with('>') {
            continue;
        }
        extraction.records_scanned += 1;

        let id = record_id(&definition);
        if targets.contains(id) {
            let sequence: String = residues
                .iter()
                .filter(|b| !b.is_ascii_whitespace())
                .map(|&b| char::from(b))
                .collect();
            extraction.sequences.insert(id.to_string(), sequence);
        }
    }

    extraction.missing = targets
        .iter()
        .filter(|id| !extraction.sequences.contains_key(*id))
        .cloned()
        .collect();

    if !extraction.missing.is_empty() {
        warn!(
            "{} genes not found (showing first {}): {}",
            extraction.missing.len(),
            MISSING_SAMPLE_SIZE.min(extraction.missing.len()),
            extraction.missing_sample(MISSING_SAMPLE_SIZE).join(", ")
        );
    }

    Ok(extraction)
}

/// First whitespace-delimited token after the `>` marker
fn record_id(definition: &str) -> &str {
    definition
        .trim_start_matches('>')
        .split_whitespace()
        .next()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn targets(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("proteomes.fasta")));
        assert!(is_fasta_file(Path::new("proteomes.faa")));
        assert!(is_fasta_file(Path::new("proteomes.faa.gz")));
        assert!(is_fasta_file(Path::new("/path/to/Family_0001.FA")));

        assert!(!is_fasta_file(Path::new("clusters.tsv")));
        assert!(!is_fasta_file(Path::new("trees.tree.gz")));
    }

    #[test]
    fn test_extract_multiline_records() {
        let fasta = ">Ecoli_A_1 some description\nMKV\nLLA\n>Salm_B_1\nMSS\n>Vibr_C_1\nMTT\nQQ\n";
        let extraction =
            extract_from_reader(fasta.as_bytes(), &targets(&["Ecoli_A_1", "Vibr_C_1"])).unwrap();

        assert_eq!(extraction.records_scanned, 3);
        assert_eq!(extraction.found_count(), 2);
        assert_eq!(extraction.sequences["Ecoli_A_1"], "MKVLLA");
        assert_eq!(extraction.sequences["Vibr_C_1"], "MTTQQ");
        assert!(!extraction.sequences.contains_key("Salm_B_1"));
        assert!(extraction.missing.is_empty());
    }

    #[test]
    fn test_found_and_missing_partition_targets() {
        let fasta = ">a_b_1\nAAA\n>a_b_2\nCCC\n";
        let wanted = targets(&["a_b_1", "x_y_1", "x_y_2"]);
        let extraction = extract_from_reader(fasta.as_bytes(), &wanted).unwrap();

        let found: HashSet<String> = extraction.sequences.keys().cloned().collect();
        let missing: HashSet<String> = extraction.missing.iter().cloned().collect();

        assert!(found.is_disjoint(&missing));
        let union: HashSet<String> = found.union(&missing).cloned().collect();
        assert_eq!(union, wanted);
        assert_eq!(extraction.missing_sample(1), vec!["x_y_1"]);
    }

    #[test]
    fn test_all_whitespace_removed_from_residues() {
        let fasta = ">a_b_1\r\nMK V\r\n\r\nLL\r\n";
        let extraction = extract_from_reader(fasta.as_bytes(), &targets(&["a_b_1"])).unwrap();
        assert_eq!(extraction.sequences["a_b_1"], "MKVLL");
    }

    #[test]
    fn test_duplicate_id_last_record_wins() {
        let fasta = ">a_b_1 first\nAAA\n>a_b_1 second\nCCC\n";
        let extraction = extract_from_reader(fasta.as_bytes(), &targets(&["a_b_1"])).unwrap();
        assert_eq!(extraction.records_scanned, 2);
        assert_eq!(extraction.sequences["a_b_1"], "CCC");
    }

    #[test]
    fn test_lines_before_first_record_ignored() {
        let fasta = "a_b_9 stray\nJUNK\n>a_b_1\nAAA\n";
        let extraction =
            extract_from_reader(fasta.as_bytes(), &targets(&["a_b_9", "a_b_1"])).unwrap();

        assert_eq!(extraction.records_scanned, 1);
        assert_eq!(extraction.sequences.len(), 1);
        assert_eq!(extraction.sequences["a_b_1"], "AAA");
        assert_eq!(extraction.missing_sample(5), vec!["a_b_9"]);
    }

    #[test]
    fn test_empty_collection() {
        let extraction = extract_from_reader("".as_bytes(), &targets(&["a_b_1"])).unwrap();
        assert_eq!(extraction.records_scanned, 0);
        assert_eq!(extraction.missing.len(), 1);
    }

    #[test]
    fn test_extract_gzipped_file() {
        let mut temp = NamedTempFile::with_suffix(".faa.gz").unwrap();
        {
            let mut encoder = GzEncoder::new(&mut temp, Compression::default());
            encoder.write_all(b">a_b_1\nMKV\n>a_b_2\nMLL\n").unwrap();
            encoder.finish().unwrap();
        }
        temp.flush().unwrap();

        let extraction = extract_sequences(temp.path(), &targets(&["a_b_2"])).unwrap();
        assert_eq!(extraction.sequences["a_b_2"], "MLL");
    }

    #[test]
    fn test_missing_file() {
        let result = extract_sequences(Path::new("/nonexistent/all.fasta"), &targets(&["x"]));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
