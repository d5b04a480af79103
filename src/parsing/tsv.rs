use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::parsing::ParseError;

/// Header of the gene-level ortholog table
pub const GENE_TABLE_HEADER: &str = "family_id\tgenome\tgene_id";

/// One row of the gene-level ortholog table
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneRow {
    pub family_id: String,
    pub genome: String,
    pub gene_id: String,
}

/// Read a clustering table of `representative<TAB>member` rows.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if a row has fewer than two fields.
pub fn read_cluster_pairs(path: &Path) -> Result<Vec<(String, String)>, ParseError> {
    let file = File::open(path)?;
    parse_cluster_pairs(BufReader::new(file))
}

/// Parse `representative<TAB>member` rows. There is no header; blank lines
/// are skipped and any columns after the second are ignored.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a non-blank line lacks a tab.
pub fn parse_cluster_pairs<R: Read>(reader: R) -> Result<Vec<(String, String)>, ParseError> {
    let mut pairs = Vec::new();

    for (i, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let (Some(rep), Some(member)) = (fields.next(), fields.next()) else {
            return Err(ParseError::InvalidFormat(format!(
                "Line {} has fewer than 2 tab-separated fields",
                i + 1
            )));
        };

        pairs.push((rep.to_string(), member.to_string()));
    }

    Ok(pairs)
}

/// Read the gene-level ortholog table written by the result writer.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if the header is missing or a row does not
/// have exactly three fields.
pub fn read_gene_table(path: &Path) -> Result<Vec<GeneRow>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_gene_table(&content)
}

/// Parse gene-level ortholog table text, header included.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` on a missing header or malformed row.
pub fn parse_gene_table(text: &str) -> Result<Vec<GeneRow>, ParseError> {
    let mut lines = text.lines();

    match lines.next() {
        Some(header) if header.trim_end() == GENE_TABLE_HEADER => {}
        _ => {
            return Err(ParseError::InvalidFormat(format!(
                "Expected header '{}'",
                GENE_TABLE_HEADER.replace('\t', "\\t")
            )))
        }
    }

    let mut rows = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 3 {
            // +2: header line plus 1-based numbering
            return Err(ParseError::InvalidFormat(format!(
                "Line {} has {} fields, expected 3",
                i + 2,
                fields.len()
            )));
        }

        rows.push(GeneRow {
            family_id: fields[0].to_string(),
            genome: fields[1].to_string(),
            gene_id: fields[2].to_string(),
        });
    }

    Ok(rows)
}
