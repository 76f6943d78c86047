//! Parser for the conserved-domain search tool's tabular output.
//!
//! `rpsbproc` emits a sectioned plain-text report. The part we consume
//! looks like:
//!
//! ```text
//! #DOMAINS
//! #<session>	<query>	<type>	<pssmid>	<from>	<to>	<evalue>	<bitscore>	<accession>	<short-name>	<incomplete>	<superfamily>
//! DOMAINS
//! 1	Query_1	Specific	238827	3	110	1.2e-30	100.1	cd00042	CAP	-	-
//! ...
//! ENDDOMAINS
//! ENDDATA
//! ```
//!
//! Rows appear in the tool's own confidence ranking; that order is
//! preserved and only the first [`MAX_HITS`] rows are kept.

/// Keep at most this many highest-confidence hits per query.
pub const MAX_HITS: usize = 5;

/// One usable row from the `DOMAINS` section.
///
/// `from`/`to` are 1-indexed inclusive residue positions into the query
/// sequence, exactly as the tool reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainHit {
    pub from: usize,
    pub to: usize,
    pub accession: String,
    pub short_name: String,
}

/// A substring of the query annotated with the hit that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSubsequence {
    pub subsequence: String,
    pub hit: DomainHit,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// The tool ran but produced zero usable rows. Callers must surface
    /// this; it is not the same as "no subsequences".
    #[error("domain search produced no usable hits")]
    NoHits,

    #[error("malformed domain report: {0}")]
    Malformed(String),
}

/// Parse the `DOMAINS` section of an rpsbproc report.
///
/// Returns the top [`MAX_HITS`] rows in report order. Rows with missing
/// or non-numeric coordinates are skipped. Zero usable rows is
/// [`DomainError::NoHits`].
pub fn parse_domain_table(report: &str) -> Result<Vec<DomainHit>, DomainError> {
    let mut keys: Vec<String> = Vec::new();
    let mut hits: Vec<DomainHit> = Vec::new();
    let mut next_line_is_header = false;
    let mut in_data = false;

    for line in report.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        if line == "#DOMAINS" {
            next_line_is_header = true;
            continue;
        }

        // The column-name line immediately follows the #DOMAINS marker.
        if next_line_is_header {
            keys = line
                .trim_start_matches('#')
                .split('\t')
                .map(|k| {
                    let k = k.trim();
                    k.strip_prefix('<')
                        .and_then(|k| k.strip_suffix('>'))
                        .unwrap_or(k)
                        .to_ascii_lowercase()
                })
                .collect();
            next_line_is_header = false;
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        match line {
            "DOMAINS" => {
                in_data = true;
                continue;
            }
            "ENDDOMAINS" => {
                in_data = false;
                continue;
            }
            "ENDDATA" => break,
            _ => {}
        }

        if !in_data {
            continue;
        }
        if keys.is_empty() {
            return Err(DomainError::Malformed(
                "data row before column header".to_string(),
            ));
        }

        let values: Vec<&str> = line.split('\t').map(str::trim).collect();
        if values.len() < keys.len() {
            continue;
        }
        let field = |name: &str| -> Option<&str> {
            keys.iter().position(|k| k == name).map(|i| values[i])
        };

        let (Some(from), Some(to)) = (field("from"), field("to")) else {
            continue;
        };
        let (Ok(from), Ok(to)) = (from.parse::<usize>(), to.parse::<usize>()) else {
            continue;
        };

        hits.push(DomainHit {
            from,
            to,
            accession: field("accession").unwrap_or_default().to_string(),
            short_name: field("short-name").unwrap_or_default().to_string(),
        });
        if hits.len() == MAX_HITS {
            break;
        }
    }

    if hits.is_empty() {
        return Err(DomainError::NoHits);
    }
    Ok(hits)
}

/// Slice the query sequence by each hit's 1-indexed inclusive range.
///
/// Hits whose range falls outside the sequence are dropped rather than
/// clamped; a bad coordinate means the hit does not describe this query.
pub fn annotated_subsequences(sequence: &str, hits: &[DomainHit]) -> Vec<AnnotatedSubsequence> {
    hits.iter()
        .filter(|h| h.from >= 1 && h.to <= sequence.len() && h.from <= h.to)
        .map(|h| AnnotatedSubsequence {
            subsequence: sequence[h.from - 1..h.to].to_string(),
            hit: h.clone(),
        })
        .collect()
}
