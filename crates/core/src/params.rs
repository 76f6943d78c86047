//! Biochemical parameter formulas.
//!
//! Deterministic functions over the bare sequence. Solvent accessibility
//! and the Ramachandran score need the generated structure file and an
//! external script, so they are computed by the pipeline's enrichment
//! step, not here.

/// Mass of one water molecule in Daltons, added once per chain.
const WATER_DALTONS: f64 = 18.015_24;

/// Sequence-derived parameters stored on a record after a successful
/// prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceParams {
    /// Molecular weight in kDa, rounded to 2 decimal places.
    pub molecular_weight: f64,
    /// Mean Kyte-Doolittle hydropathy, rounded to 4 decimal places.
    pub hydrophobicity: f64,
    /// Guruprasad instability index, rounded to 2 decimal places.
    pub instability: f64,
    /// Isoelectric point (IPC protein scale), rounded to 2 decimal places.
    pub isoelectric_point: f64,
}

/// Compute all sequence-derived parameters in one pass.
pub fn compute_parameters(sequence: &str) -> SequenceParams {
    SequenceParams {
        molecular_weight: molecular_weight_kda(sequence),
        hydrophobicity: mean_hydrophobicity(sequence),
        instability: instability_index(sequence),
        isoelectric_point: isoelectric_point(sequence),
    }
}

/// Average residue mass in Daltons. Unknown letters contribute nothing.
fn residue_mass(aa: char) -> f64 {
    match aa {
        'A' => 71.0788,
        'R' => 156.1875,
        'N' => 114.1038,
        'D' => 115.0886,
        'C' => 103.1388,
        'E' => 129.1155,
        'Q' => 128.1307,
        'G' => 57.0519,
        'H' => 137.1411,
        'I' => 113.1594,
        'L' => 113.1594,
        'K' => 128.1741,
        'M' => 131.1926,
        'F' => 147.1766,
        'P' => 97.1167,
        'S' => 87.0782,
        'T' => 101.1051,
        'W' => 186.2132,
        'Y' => 163.1760,
        'V' => 99.1326,
        _ => 0.0,
    }
}

/// Kyte-Doolittle hydropathy value. Positive is hydrophobic.
fn hydropathy(aa: char) -> Option<f64> {
    Some(match aa {
        'A' => 1.8,
        'R' => -4.5,
        'N' => -3.5,
        'D' => -3.5,
        'C' => 2.5,
        'Q' => -3.5,
        'E' => -3.5,
        'G' => -0.4,
        'H' => -3.2,
        'I' => 4.5,
        'L' => 3.8,
        'K' => -3.9,
        'M' => 1.9,
        'F' => 2.8,
        'P' => -1.6,
        'S' => -0.8,
        'T' => -0.7,
        'W' => -0.9,
        'Y' => -1.3,
        'V' => 4.2,
        _ => return None,
    })
}

/// Dipeptide instability weight value (DIWV). Pairs absent from the
/// table contribute nothing.
fn diwv(first: char, second: char) -> f64 {
    match (first, second) {
        ('W', 'M') | ('W', 'H') => 24.68,
        ('W', 'N') | ('W', 'L') => 13.34,
        ('W', 'T') | ('W', 'A') => -14.03,
        ('W', 'V') => -7.49,
        ('W', 'G') => -9.37,
        ('W', _) => 1.0,
        ('A', 'C') => 44.94,
        ('A', 'H') | ('A', 'D') => -7.49,
        ('A', 'P') => 20.26,
        ('A', _) => 1.0,
        ('L', 'W') => 24.68,
        ('L', 'Q') => 33.6,
        ('L', 'R') | ('L', 'P') => 20.26,
        ('L', 'K') => -7.49,
        ('L', _) => 1.0,
        _ => 0.0,
    }
}

/// Molecular weight in kDa: sum of average residue masses plus one water,
/// rounded to 2 decimal places.
pub fn molecular_weight_kda(sequence: &str) -> f64 {
    let daltons: f64 = sequence.chars().map(residue_mass).sum::<f64>() + WATER_DALTONS;
    round_to(daltons / 1000.0, 2)
}

/// Mean Kyte-Doolittle hydropathy over recognised residues, 4 decimal
/// places. Zero when no residue is recognised.
pub fn mean_hydrophobicity(sequence: &str) -> f64 {
    let values: Vec<f64> = sequence.chars().filter_map(hydropathy).collect();
    if values.is_empty() {
        return 0.0;
    }
    round_to(values.iter().sum::<f64>() / values.len() as f64, 4)
}

/// Guruprasad instability index: scaled sum of dipeptide weight values
/// over the sliding window of adjacent residue pairs, 2 decimal places.
pub fn instability_index(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }
    let chars: Vec<char> = sequence.chars().collect();
    let total: f64 = chars.windows(2).map(|w| diwv(w[0], w[1])).sum();
    round_to(10.0 / sequence.len() as f64 * total, 2)
}

/// pK values from the IPC protein scale.
struct PkScale {
    c_term: f64,
    asp: f64,
    glu: f64,
    cys: f64,
    tyr: f64,
    his: f64,
    n_term: f64,
    lys: f64,
    arg: f64,
}

const IPC_PROTEIN: PkScale = PkScale {
    c_term: 2.869,
    asp: 3.872,
    glu: 4.412,
    cys: 7.555,
    tyr: 10.85,
    his: 5.637,
    n_term: 9.094,
    lys: 9.052,
    arg: 11.84,
};

/// Isoelectric point: bisection on net charge with the IPC protein pK
/// scale, to a precision of 0.01 pH units.
pub fn isoelectric_point(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }
    let count = |aa: char| sequence.chars().filter(|&c| c == aa).count() as f64;
    let (n_asp, n_glu, n_cys, n_tyr) = (count('D'), count('E'), count('C'), count('Y'));
    let (n_his, n_lys, n_arg) = (count('H'), count('K'), count('R'));
    let s = IPC_PROTEIN;

    let mut ph = 6.51;
    let mut ph_prev = 0.0;
    let mut ph_next = 14.0;
    let precision = 0.01;

    loop {
        let negative = -1.0 / (1.0 + 10f64.powf(s.c_term - ph))
            - n_asp / (1.0 + 10f64.powf(s.asp - ph))
            - n_glu / (1.0 + 10f64.powf(s.glu - ph))
            - n_cys / (1.0 + 10f64.powf(s.cys - ph))
            - n_tyr / (1.0 + 10f64.powf(s.tyr - ph));
        let positive = n_his / (1.0 + 10f64.powf(ph - s.his))
            + 1.0 / (1.0 + 10f64.powf(ph - s.n_term))
            + n_lys / (1.0 + 10f64.powf(ph - s.lys))
            + n_arg / (1.0 + 10f64.powf(ph - s.arg));

        if negative + positive < 0.0 {
            let mid = ph;
            ph -= (ph - ph_prev) / 2.0;
            ph_next = mid;
        } else {
            let mid = ph;
            ph += (ph_next - ph) / 2.0;
            ph_prev = mid;
        }

        if (ph - ph_prev) < precision && (ph_next - ph) < precision {
            return round_to(ph, 2);
        }
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn molecular_weight_of_single_glycine() {
        // 57.0519 + water = 75.06714 Da -> 0.08 kDa.
        assert_eq!(molecular_weight_kda("G"), 0.08);
    }

    #[test]
    fn molecular_weight_accumulates() {
        // M + K + T = 131.1926 + 128.1741 + 101.1051 + 18.01524 = 378.487 Da.
        assert_eq!(molecular_weight_kda("MKT"), 0.38);
    }

    #[test]
    fn hydrophobicity_of_uniform_sequence_is_residue_value() {
        assert_eq!(mean_hydrophobicity("IIII"), 4.5);
        assert_eq!(mean_hydrophobicity("RRR"), -4.5);
    }

    #[test]
    fn hydrophobicity_averages() {
        // (4.5 + -4.5) / 2 = 0.
        assert_eq!(mean_hydrophobicity("IR"), 0.0);
    }

    #[test]
    fn instability_uses_dipeptide_windows() {
        // "AC" -> one window worth 44.94: 10/2 * 44.94 = 224.7.
        assert_eq!(instability_index("AC"), 224.7);
        // Pairs outside the table contribute zero.
        assert_eq!(instability_index("GG"), 0.0);
    }

    #[test]
    fn isoelectric_point_brackets_neutral() {
        let ip = isoelectric_point("MKTAYIAKQR");
        assert!(ip > 7.0 && ip < 14.0, "basic sequence should have high pI, got {ip}");
        let acidic = isoelectric_point("DDEEDDEE");
        assert!(acidic < 7.0, "acidic sequence should have low pI, got {acidic}");
    }

    #[test]
    fn empty_sequence_yields_zeroes() {
        let p = compute_parameters("");
        assert_eq!(p.molecular_weight, 0.02); // bare water
        assert_eq!(p.hydrophobicity, 0.0);
        assert_eq!(p.instability, 0.0);
        assert_eq!(p.isoelectric_point, 0.0);
    }
}
