//! Universal per-residue constant tables.
//!
//! These are fixed physicochemical constants, not tunable design inputs, so
//! they live here as compile-time maps rather than in the injectable
//! [`DesignTables`](crate::engine::config::DesignTables).

use phf::{Map, phf_map};

/// Average mass of one water molecule, in Daltons.
pub const WATER_MASS: f64 = 18.0153;

/// Fallback mass for a residue missing from [`RESIDUE_MASS`], in Daltons.
pub const DEFAULT_RESIDUE_MASS: f64 = 110.0;

/// Average masses of the free amino acids, in Daltons.
///
/// Peptide-bond formation releases one water per bond, so the mass of a chain
/// of length `n` is the sum of its free-residue masses minus `(n - 1)` waters.
pub static RESIDUE_MASS: Map<char, f64> = phf_map! {
    'A' => 89.09, 'R' => 174.20, 'N' => 132.12, 'D' => 133.10,
    'C' => 121.15, 'Q' => 146.15, 'E' => 147.13, 'G' => 75.07,
    'H' => 155.16, 'I' => 131.17, 'L' => 131.17, 'K' => 146.19,
    'M' => 149.21, 'F' => 165.19, 'P' => 115.13, 'S' => 105.09,
    'T' => 119.12, 'W' => 204.23, 'Y' => 181.19, 'V' => 117.15,
};

/// Kyte-Doolittle hydropathy values.
pub static HYDROPATHY: Map<char, f64> = phf_map! {
    'A' => 1.8, 'R' => -4.5, 'N' => -3.5, 'D' => -3.5,
    'C' => 2.5, 'Q' => -3.5, 'E' => -3.5, 'G' => -0.4,
    'H' => -3.2, 'I' => 4.5, 'L' => 3.8, 'K' => -3.9,
    'M' => 1.9, 'F' => 2.8, 'P' => -1.6, 'S' => -0.8,
    'T' => -0.7, 'W' => -0.9, 'Y' => -1.3, 'V' => 4.2,
};

/// Side-chain pKa values (EMBOSS set) for the ionizable residues.
pub static PKA_SIDE_CHAIN: Map<char, f64> = phf_map! {
    'C' => 8.5, 'D' => 3.9, 'E' => 4.1, 'H' => 6.5,
    'K' => 10.8, 'R' => 12.5, 'Y' => 10.1,
};

/// pKa of the free alpha-amino terminus (EMBOSS).
pub const PKA_N_TERMINUS: f64 = 8.6;
/// pKa of the free alpha-carboxyl terminus (EMBOSS).
pub const PKA_C_TERMINUS: f64 = 3.6;

/// Weight applied to a dipeptide missing from [`DIPEPTIDE_INSTABILITY`].
pub const DEFAULT_DIPEPTIDE_WEIGHT: f64 = 1.0;

/// Curated dipeptide instability weights for the Guruprasad index.
///
/// The full published matrix assigns a weight to every ordered residue pair;
/// the large majority of those entries are 1.0. This table keeps the strongly
/// destabilizing pairs (proline- and glycine-coupled, acid/amide couples) and
/// the notable stabilizing ones; every pair not listed falls back to
/// [`DEFAULT_DIPEPTIDE_WEIGHT`]. The index for a sequence of length `n` is
/// `(10 / n) * sum of the n - 1 dipeptide weights`; values of 40 and above
/// flag the chain as unstable.
pub static DIPEPTIDE_INSTABILITY: Map<&'static str, f64> = phf_map! {
    // Destabilizing: X-P couples.
    "DP" => 58.28, "NP" => 44.94, "EP" => 44.94, "PP" => 44.94,
    "SP" => 33.60, "TP" => 33.60, "GP" => 24.68, "KP" => 24.68,
    "WP" => 24.68, "HP" => 24.68, "AP" => 20.26, "RP" => 20.26,
    "QP" => 20.26, "FP" => 20.26, "CP" => 20.26, "LP" => 13.34,
    "IP" => 13.34, "VP" => 13.34, "YP" => 13.34, "MP" => 13.34,
    // Destabilizing: glycine couples and flexible turns.
    "PG" => 24.68, "GG" => 13.34, "NG" => 13.34, "QG" => 13.34,
    "SG" => 13.34, "DG" => 24.68,
    // Destabilizing: acid/amide self-couples and degradation-prone pairs.
    "NN" => 13.34, "NS" => 13.34, "NT" => 13.34, "DS" => 20.26,
    "DD" => 13.34, "EE" => 13.34, "KK" => 13.34, "RR" => 13.34,
    // Stabilizing pairs.
    "YV" => -6.54, "YF" => -9.37, "WF" => -14.03, "FW" => -9.37,
    "VL" => -7.49, "IL" => -7.49, "LV" => -6.54, "CC" => -1.88,
    "AG" => -7.49, "GA" => -7.49, "KE" => -6.54, "ER" => -6.54,
    "DK" => -9.37, "TS" => -1.88,
};

/// Human-preferred codon for each amino acid, used for back-translation.
pub static CODON: Map<char, &'static str> = phf_map! {
    'A' => "GCT", 'C' => "TGC", 'D' => "GAC", 'E' => "GAG", 'F' => "TTC",
    'G' => "GGC", 'H' => "CAC", 'I' => "ATC", 'K' => "AAG", 'L' => "CTG",
    'M' => "ATG", 'N' => "AAC", 'P' => "CCC", 'Q' => "CAG", 'R' => "CGC",
    'S' => "TCC", 'T' => "ACC", 'V' => "GTG", 'W' => "TGG", 'Y' => "TAC",
};

/// Back-translates an amino-acid sequence into DNA using the human-preferred
/// codon table. Unknown residues map to `NNN`.
pub fn back_translate(seq: &str) -> String {
    let mut dna = String::with_capacity(seq.len() * 3);
    for aa in seq.chars() {
        dna.push_str(CODON.get(&aa).copied().unwrap_or("NNN"));
    }
    dna
}
