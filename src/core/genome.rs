//! Genome naming derived from gene identifiers.
//!
//! Gene identifiers are expected to follow the `Genus_species_locusAccession`
//! convention produced by the download stage, e.g.
//! `Dickeya_chrysanthemi_WP_226052722.1`. The genome (and species display
//! name) is the binomial prefix.

/// Return the genome name encoded in a gene identifier.
///
/// - three or more `_`-separated tokens: the first two tokens joined by `_`
/// - two tokens or fewer: the identifier unchanged
///
/// This is a naming convention, not a validation: trinomial or
/// strain-qualified names are cut after the second token.
///
/// # Examples
///
/// ```
/// use orthotree::core::genome::genome_of;
///
/// assert_eq!(genome_of("Salmonella_enterica_WP_000123.1"), "Salmonella_enterica");
/// assert_eq!(genome_of("Escherichia_coli"), "Escherichia_coli");
/// assert_eq!(genome_of("orphan"), "orphan");
/// ```
#[must_use]
pub fn genome_of(gene_id: &str) -> &str {
    let mut separators = gene_id.match_indices('_').map(|(i, _)| i);
    match (separators.next(), separators.next()) {
        (Some(_), Some(second)) => &gene_id[..second],
        _ => gene_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial_prefix() {
        assert_eq!(genome_of("Ecoli_A_1"), "Ecoli_A");
        assert_eq!(
            genome_of("Dickeya_chrysanthemi_WP_226052722.1"),
            "Dickeya_chrysanthemi"
        );
        assert_eq!(genome_of("A_b_locus"), "A_b");
    }

    #[test]
    fn test_two_tokens_unchanged() {
        assert_eq!(genome_of("Ecoli_WP1"), "Ecoli_WP1");
        assert_eq!(genome_of("A_b"), "A_b");
    }

    #[test]
    fn test_single_token_unchanged() {
        assert_eq!(genome_of("R1"), "R1");
        assert_eq!(genome_of(""), "");
    }

    #[test]
    fn test_empty_tokens() {
        // Degenerate separators still count as tokens
        assert_eq!(genome_of("__x"), "_");
        assert_eq!(genome_of("a__"), "a_");
        assert_eq!(genome_of("a_"), "a_");
    }
}
