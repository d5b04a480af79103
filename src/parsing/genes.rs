//! Reader for the genes-for-alignment artifact.
//!
//! The artifact is a series of blocks:
//!
//! ```text
//! Family: Ecoli_A_1 (3 species)
//! Ecoli_A_1
//! Salm_B_1
//! Vibr_C_1
//!
//! ```

use std::path::Path;

use crate::core::family::FamilyDescriptor;
use crate::parsing::ParseError;

pub const FAMILY_PREFIX: &str = "Family:";

/// Read family descriptors from a genes-for-alignment file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if a `Family:` header is malformed.
pub fn read_genes_file(path: &Path) -> Result<Vec<FamilyDescriptor>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_genes_text(&content)
}

/// Parse genes-for-alignment text into descriptors, in file order.
///
/// Gene lines that appear before the first `Family:` header are ignored.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a `Family:` header has no
/// representative or its `(<N> species)` count cannot be parsed.
pub fn parse_genes_text(text: &str) -> Result<Vec<FamilyDescriptor>, ParseError> {
    let mut families: Vec<FamilyDescriptor> = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(FAMILY_PREFIX) {
            families.push(parse_family_header(rest, i + 1)?);
        } else if let Some(current) = families.last_mut() {
            current.members.push(line.to_string());
        }
    }

    Ok(families)
}

fn parse_family_header(rest: &str, line_num: usize) -> Result<FamilyDescriptor, ParseError> {
    let mut tokens = rest.split_whitespace();

    let representative = tokens.next().ok_or_else(|| {
        ParseError::InvalidFormat(format!("Line {line_num}: family header has no representative"))
    })?;

    let count_token = tokens.next().ok_or_else(|| {
        ParseError::InvalidFormat(format!(
            "Line {line_num}: family header for '{representative}' has no species count"
        ))
    })?;

    let genome_count: usize = count_token
        .trim_start_matches('(')
        .parse()
        .map_err(|_| {
            ParseError::InvalidFormat(format!(
                "Line {line_num}: invalid species count '{count_token}'"
            ))
        })?;

    Ok(FamilyDescriptor::new(representative, genome_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blocks() {
        let text = "Family: R1 (3 species)\nEcoli_A_1\nSalm_B_1\nVibr_C_1\n\n\
                    Family: R2 (2 species)\nEcoli_A_2\nSalm_B_2\n\n";
        let families = parse_genes_text(text).unwrap();

        assert_eq!(families.len(), 2);
        assert_eq!(families[0].representative, "R1");
        assert_eq!(families[0].genome_count, 3);
        assert_eq!(
            families[0].members,
            vec!["Ecoli_A_1", "Salm_B_1", "Vibr_C_1"]
        );
        assert_eq!(families[1].genome_count, 2);
        assert_eq!(families[1].members.len(), 2);
    }

    #[test]
    fn test_family_without_members() {
        let families = parse_genes_text("Family: R1 (0 species)\n\n").unwrap();
        assert_eq!(families.len(), 1);
        assert!(families[0].members.is_empty());
    }

    #[test]
    fn test_genes_before_header_ignored() {
        let families = parse_genes_text("stray_gene\nFamily: R1 (1 species)\nA_b_1\n").unwrap();
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].members, vec!["A_b_1"]);
    }

    #[test]
    fn test_malformed_header() {
        let err = parse_genes_text("Family: R1\nA_b_1\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(msg) if msg.contains("Line 1")));

        let err = parse_genes_text("A\nFamily: R1 (many species)\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(msg) if msg.contains("Line 2")));

        assert!(parse_genes_text("Family:\n").is_err());
    }

    #[test]
    fn test_empty_text() {
        assert!(parse_genes_text("").unwrap().is_empty());
    }
}
