//! Whole-sequence physicochemical property analysis.
//!
//! [`analyze`] is the full per-residue model and rejects sequences containing
//! non-standard letters; [`estimate`] is a total fallback that never fails.
//! Downstream feasibility checks use [`analyze_or_estimate`] so that a
//! malformed sequence degrades to estimated properties instead of aborting
//! the evaluation.

use super::classes;
use super::tables;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    #[error("sequence is empty")]
    EmptySequence,

    #[error("unknown residue '{residue}' at position {position}")]
    UnknownResidue { residue: char, position: usize },
}

/// Physicochemical property bag for one amino-acid sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceProperties {
    pub length: usize,
    /// Average chain mass in Daltons.
    pub molecular_weight: f64,
    pub isoelectric_point: f64,
    /// Grand average of hydropathy (Kyte-Doolittle).
    pub gravy: f64,
    /// Guruprasad dipeptide instability index; >= 40 indicates an unstable chain.
    pub instability_index: f64,
    /// Fraction of aromatic (F/W/Y) residues.
    pub aromaticity: f64,
    /// Net charge at pH 7: count(K, R, H) - count(D, E).
    pub net_charge_at_ph7: i64,
}

/// Computes the full property bag for `seq`.
///
/// # Errors
///
/// Returns an error for an empty sequence or one containing a letter outside
/// the 20 standard one-letter codes.
pub fn analyze(seq: &str) -> Result<SequenceProperties, AnalysisError> {
    if seq.is_empty() {
        return Err(AnalysisError::EmptySequence);
    }
    if let Some((position, residue)) = seq
        .char_indices()
        .find(|&(_, c)| !c.is_ascii() || !classes::is_standard(c as u8))
    {
        return Err(AnalysisError::UnknownResidue { residue, position });
    }

    Ok(SequenceProperties {
        length: seq.len(),
        molecular_weight: molecular_weight(seq),
        isoelectric_point: isoelectric_point(seq),
        gravy: gravy(seq),
        instability_index: instability_index(seq),
        aromaticity: classes::class_fraction(seq, classes::AROMATIC),
        net_charge_at_ph7: net_charge_at_ph7(seq),
    })
}

/// Simplified property estimators; never fails, even for empty input or
/// sequences containing non-standard letters.
pub fn estimate(seq: &str) -> SequenceProperties {
    let length = seq.chars().count();
    let free_mass_sum: f64 = seq
        .chars()
        .map(|aa| {
            tables::RESIDUE_MASS
                .get(&aa)
                .copied()
                .unwrap_or(tables::DEFAULT_RESIDUE_MASS)
        })
        .sum();
    let gravy = if length == 0 {
        0.0
    } else {
        seq.chars()
            .map(|aa| tables::HYDROPATHY.get(&aa).copied().unwrap_or(0.0))
            .sum::<f64>()
            / length as f64
    };

    SequenceProperties {
        length,
        molecular_weight: free_mass_sum,
        isoelectric_point: 7.0,
        gravy,
        instability_index: 30.0,
        aromaticity: classes::class_fraction(seq, classes::AROMATIC),
        net_charge_at_ph7: net_charge_at_ph7(seq),
    }
}

/// Full analysis where possible, estimated properties otherwise.
pub fn analyze_or_estimate(seq: &str) -> SequenceProperties {
    match analyze(seq) {
        Ok(props) => props,
        Err(err) => {
            debug!(%err, "full sequence analysis failed, using simplified estimators");
            estimate(seq)
        }
    }
}

fn molecular_weight(seq: &str) -> f64 {
    let free_sum: f64 = seq
        .chars()
        .map(|aa| {
            tables::RESIDUE_MASS
                .get(&aa)
                .copied()
                .unwrap_or(tables::DEFAULT_RESIDUE_MASS)
        })
        .sum();
    free_sum - (seq.len().saturating_sub(1)) as f64 * tables::WATER_MASS
}

fn gravy(seq: &str) -> f64 {
    seq.chars()
        .map(|aa| tables::HYDROPATHY.get(&aa).copied().unwrap_or(0.0))
        .sum::<f64>()
        / seq.len() as f64
}

fn instability_index(seq: &str) -> f64 {
    if seq.len() < 2 {
        return 0.0;
    }
    let s = seq.as_bytes();
    let weight_sum: f64 = (0..s.len() - 1)
        .map(|i| {
            let dipeptide = [s[i], s[i + 1]];
            // Keys are guaranteed ASCII by `analyze`.
            let key = std::str::from_utf8(&dipeptide).unwrap_or("");
            tables::DIPEPTIDE_INSTABILITY
                .get(key)
                .copied()
                .unwrap_or(tables::DEFAULT_DIPEPTIDE_WEIGHT)
        })
        .sum();
    10.0 / seq.len() as f64 * weight_sum
}

fn net_charge_at_ph7(seq: &str) -> i64 {
    let positive = classes::count_in_class(seq, classes::CHARGED_POSITIVE) as i64;
    let negative = classes::count_in_class(seq, classes::CHARGED_NEGATIVE) as i64;
    positive - negative
}

/// Net charge of the chain at the given pH under the Henderson-Hasselbalch
/// model, with one free amino and one free carboxyl terminus.
fn charge_at_ph(seq: &str, ph: f64) -> f64 {
    let positive_fraction = |pka: f64| 1.0 / (1.0 + 10f64.powf(ph - pka));
    let negative_fraction = |pka: f64| 1.0 / (1.0 + 10f64.powf(pka - ph));

    let mut charge = positive_fraction(tables::PKA_N_TERMINUS);
    charge -= negative_fraction(tables::PKA_C_TERMINUS);

    for aa in seq.chars() {
        match aa {
            'K' | 'R' | 'H' => {
                if let Some(&pka) = tables::PKA_SIDE_CHAIN.get(&aa) {
                    charge += positive_fraction(pka);
                }
            }
            'D' | 'E' | 'C' | 'Y' => {
                if let Some(&pka) = tables::PKA_SIDE_CHAIN.get(&aa) {
                    charge -= negative_fraction(pka);
                }
            }
            _ => {}
        }
    }
    charge
}

fn isoelectric_point(seq: &str) -> f64 {
    // Net charge is strictly decreasing in pH, so bisection converges.
    let mut low = 0.0;
    let mut high = 14.0;
    let mut mid = 7.0;
    for _ in 0..100 {
        mid = (low + high) / 2.0;
        let charge = charge_at_ph(seq, mid);
        if charge.abs() < 1e-4 {
            break;
        }
        if charge > 0.0 {
            low = mid;
        } else {
            high = mid;
        }
    }
    mid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_rejects_empty_sequence() {
        assert_eq!(analyze(""), Err(AnalysisError::EmptySequence));
    }

    #[test]
    fn analyze_rejects_unknown_residue() {
        assert_eq!(
            analyze("ACDX"),
            Err(AnalysisError::UnknownResidue {
                residue: 'X',
                position: 3
            })
        );
    }

    #[test]
    fn molecular_weight_subtracts_water_per_bond() {
        // Two glycines joined by one peptide bond.
        let props = analyze("GG").unwrap();
        let expected = 2.0 * 75.07 - tables::WATER_MASS;
        assert!((props.molecular_weight - expected).abs() < 1e-9);
    }

    #[test]
    fn gravy_is_mean_hydropathy() {
        // A (1.8) and V (4.2).
        let props = analyze("AV").unwrap();
        assert!((props.gravy - 3.0).abs() < 1e-9);
    }

    #[test]
    fn isoelectric_point_tracks_charge_composition() {
        let basic = analyze("KKKKKK").unwrap();
        let acidic = analyze("DDDDDD").unwrap();
        assert!(basic.isoelectric_point > 9.0);
        assert!(acidic.isoelectric_point < 5.0);
        assert!(charge_at_ph("KKKKKK", basic.isoelectric_point).abs() < 1e-3);
    }

    #[test]
    fn net_charge_counts_basic_minus_acidic() {
        let props = analyze("KRHDE").unwrap();
        assert_eq!(props.net_charge_at_ph7, 1);
    }

    #[test]
    fn instability_index_flags_proline_rich_chains() {
        let unstable = analyze("DPDPDPDPDPDP").unwrap();
        let stable = analyze("WFWFWFWFWFWF").unwrap();
        assert!(unstable.instability_index >= 40.0);
        assert!(stable.instability_index < 40.0);
    }

    #[test]
    fn instability_index_of_single_residue_is_zero() {
        assert_eq!(analyze("A").unwrap().instability_index, 0.0);
    }

    #[test]
    fn estimate_never_fails() {
        let empty = estimate("");
        assert_eq!(empty.length, 0);
        assert_eq!(empty.gravy, 0.0);
        assert_eq!(empty.isoelectric_point, 7.0);

        let odd = estimate("AXZ");
        assert_eq!(odd.length, 3);
        assert_eq!(odd.instability_index, 30.0);
    }

    #[test]
    fn analyze_or_estimate_degrades_instead_of_failing() {
        let props = analyze_or_estimate("ABBA");
        assert_eq!(props.length, 4);
        assert_eq!(props.isoelectric_point, 7.0);
    }
}
