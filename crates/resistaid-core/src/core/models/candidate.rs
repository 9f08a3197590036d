use crate::core::chem::classes;
use md5::{Digest, Md5};
use serde::Serialize;

/// Design-time quality metrics, computed once when the candidate is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DesignMetrics {
    /// Overall design confidence in `[0.3, 0.95]`.
    pub confidence: f64,
    /// Fraction of loop3 drawn from the mutation's preferred residues.
    pub binding_optimization: f64,
    /// Proximity of the hydrophobic fraction to the antibody optimum.
    pub stability: f64,
    /// Proximity of the charged fraction to the antibody optimum.
    pub specificity: f64,
}

/// Coarse residue-composition counters carried for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompositionSummary {
    pub aromatic_count: usize,
    pub charged_count: usize,
    pub cysteine_count: usize,
    pub glycosylation_sites: usize,
}

impl CompositionSummary {
    pub fn of(sequence: &str) -> Self {
        Self {
            aromatic_count: classes::count_in_class(sequence, classes::AROMATIC),
            charged_count: classes::count_in_class(sequence, classes::CHARGED),
            cysteine_count: classes::count_residue(sequence, b'C'),
            glycosylation_sites: classes::glycosylation_sites(sequence),
        }
    }
}

/// One synthesized variable-domain candidate.
///
/// Candidates are immutable once built: the sequence, loops, and metrics are
/// fixed at creation and all later pipeline stages derive from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    /// `DES_<mutation>_<index>_<hash8>`, content-addressed by sequence.
    pub id: String,
    /// Full variable-domain amino-acid sequence.
    pub sequence: String,
    pub loop1: String,
    pub loop2: String,
    /// The binding-dominant third hypervariable loop.
    pub loop3: String,
    /// Name of the framework template the scaffold was built on.
    pub framework: String,
    pub metrics: DesignMetrics,
    pub composition: CompositionSummary,
    /// Back-translated DNA using the human-preferred codon table.
    pub dna: String,
}

impl Candidate {
    /// Content-addressed identifier: mutation id, 1-based ordinal, and the
    /// first 8 hex characters of the sequence digest.
    pub fn derive_id(mutation_id: &str, ordinal: usize, sequence: &str) -> String {
        let digest = Md5::digest(sequence.as_bytes());
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        format!("DES_{}_{:03}_{}", mutation_id, ordinal, &hex[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_id_is_content_addressed() {
        let a = Candidate::derive_id("L755S", 1, "EVQL");
        let b = Candidate::derive_id("L755S", 1, "EVQL");
        let c = Candidate::derive_id("L755S", 1, "EVQM");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("DES_L755S_001_"));
        assert_eq!(a.len(), "DES_L755S_001_".len() + 8);
    }

    #[test]
    fn composition_summary_counts_classes() {
        let summary = CompositionSummary::of("FWYCCKDNAS");
        assert_eq!(summary.aromatic_count, 3);
        assert_eq!(summary.charged_count, 2);
        assert_eq!(summary.cysteine_count, 2);
        assert_eq!(summary.glycosylation_sites, 1);
    }

    #[test]
    fn composition_summary_of_empty_sequence_is_zeroed() {
        let summary = CompositionSummary::of("");
        assert_eq!(summary.aromatic_count, 0);
        assert_eq!(summary.glycosylation_sites, 0);
    }
}
