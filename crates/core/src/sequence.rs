//! Amino-acid sequence validation and FASTA formatting.

use crate::error::CoreError;

/// The 20 standard amino-acid one-letter codes.
pub const STANDARD_AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// Maximum sequence length accepted for submission.
pub const MAX_SEQUENCE_LEN: usize = 10_000;

/// Check that a sequence consists solely of the 20 standard amino-acid
/// letters (case-insensitive). Empty sequences are invalid.
pub fn is_amino_sequence(sequence: &str) -> bool {
    !sequence.is_empty()
        && sequence
            .chars()
            .all(|c| STANDARD_AMINO_ACIDS.contains(c.to_ascii_uppercase()))
}

/// Validate a sequence for submission: alphabet and length.
pub fn validate_sequence(sequence: &str) -> Result<(), CoreError> {
    if sequence.is_empty() {
        return Err(CoreError::Validation(
            "Sequence must not be empty".to_string(),
        ));
    }
    if sequence.len() > MAX_SEQUENCE_LEN {
        return Err(CoreError::Validation(format!(
            "Sequence must not exceed {MAX_SEQUENCE_LEN} residues"
        )));
    }
    if !is_amino_sequence(sequence) {
        return Err(CoreError::Validation(
            "Sequence may only contain the 20 standard amino-acid letters".to_string(),
        ));
    }
    Ok(())
}

/// Uppercase a sequence so that lookups and dedup keys are canonical.
pub fn normalize(sequence: &str) -> String {
    sequence.to_ascii_uppercase()
}

/// Render a single-entry FASTA file body with the given header name.
pub fn to_fasta(header: &str, sequence: &str) -> String {
    format!(">{header}\n{sequence}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn accepts_standard_residues_any_case() {
        assert!(is_amino_sequence("MKTAYIAKQR"));
        assert!(is_amino_sequence("mktayiakqr"));
        assert!(is_amino_sequence("MkTaY"));
    }

    #[test]
    fn rejects_non_standard_letters() {
        // B, J, O, U, X, Z are not standard residues.
        assert!(!is_amino_sequence("MKTZ"));
        assert!(!is_amino_sequence("MKTB"));
        assert!(!is_amino_sequence("MKT X"));
        assert!(!is_amino_sequence("MKT1"));
    }

    #[test]
    fn rejects_empty() {
        assert!(!is_amino_sequence(""));
        assert_matches!(validate_sequence(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn validate_rejects_oversized() {
        let seq = "A".repeat(MAX_SEQUENCE_LEN + 1);
        assert_matches!(validate_sequence(&seq), Err(CoreError::Validation(_)));
    }

    #[test]
    fn fasta_has_header_and_trailing_newline() {
        assert_eq!(to_fasta("query", "MKT"), ">query\nMKT\n");
    }
}
