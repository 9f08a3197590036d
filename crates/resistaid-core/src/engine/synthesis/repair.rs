//! Biochemical pattern repair for freshly drawn loop regions.
//!
//! Two rules, applied in order over a single left-to-right pass each:
//!
//! 1. No run of three identical residues (aggregation-prone): the middle
//!    residue is replaced with a different randomly drawn one.
//! 2. No N-glycosylation sequon `N-[^P]-[S/T]`: the middle residue is
//!    redrawn from the alphabet excluding N/S/G until the site no longer
//!    matches, forcing proline if the redraw limit is exhausted.
//!
//! Replacements never change the region length, and the pass order
//! guarantees both postconditions hold on the returned string (a sequon fix
//! always lands on proline, which can neither extend a run nor seed a new
//! sequon).

use crate::core::chem::classes;
use rand::Rng;
use rand::seq::SliceRandom;

/// Replacement alphabet for sequon repair: every standard residue except
/// N, S, and G.
const SEQUON_REPLACEMENTS: &[u8] = b"ACDEFHIKLMPQRTVWY";

const SEQUON_REDRAW_LIMIT: usize = 32;

fn is_sequon_at(s: &[u8], i: usize) -> bool {
    s[i] == b'N' && s[i + 1] != b'P' && (s[i + 2] == b'S' || s[i + 2] == b'T')
}

/// Repairs `region` in place-equivalent fashion, returning the fixed string.
pub fn repair(region: &str, rng: &mut impl Rng) -> String {
    let mut s: Vec<u8> = region.bytes().collect();
    if s.len() < 3 {
        return region.to_string();
    }

    for i in 0..s.len() - 2 {
        if s[i] == s[i + 1] && s[i + 1] == s[i + 2] {
            let alternatives: Vec<u8> = classes::AMINO_ACIDS
                .iter()
                .copied()
                .filter(|&aa| aa != s[i + 1])
                .collect();
            if let Some(&replacement) = alternatives.choose(rng) {
                s[i + 1] = replacement;
            }
        }
    }

    for i in 0..s.len() - 2 {
        if !is_sequon_at(&s, i) {
            continue;
        }
        for _ in 0..SEQUON_REDRAW_LIMIT {
            if let Some(&replacement) = SEQUON_REPLACEMENTS.choose(rng) {
                s[i + 1] = replacement;
            }
            if !is_sequon_at(&s, i) {
                break;
            }
        }
        if is_sequon_at(&s, i) {
            s[i + 1] = b'P';
        }
    }

    s.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn repair_removes_triple_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        for seed_extra in 0..50u64 {
            let mut rng2 = StdRng::seed_from_u64(seed_extra);
            let fixed = repair("AAAAAAWWWTTT", &mut rng2);
            assert!(
                !classes::has_triple_repeat(&fixed),
                "triple repeat survived: {fixed}"
            );
            assert_eq!(fixed.len(), 12);
        }
        let fixed = repair("YYY", &mut rng);
        assert!(!classes::has_triple_repeat(&fixed));
    }

    #[test]
    fn repair_removes_glycosylation_sequons() {
        for seed in 0..50u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let fixed = repair("NASQNGTWNAT", &mut rng);
            assert_eq!(
                classes::glycosylation_sites(&fixed),
                0,
                "sequon survived: {fixed}"
            );
            assert_eq!(fixed.len(), 11);
        }
    }

    #[test]
    fn repair_preserves_clean_regions() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(repair("YFWRHDEK", &mut rng), "YFWRHDEK");
    }

    #[test]
    fn repair_leaves_short_regions_untouched() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(repair("NA", &mut rng), "NA");
        assert_eq!(repair("", &mut rng), "");
    }

    #[test]
    fn proline_blocked_sites_are_not_touched() {
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(repair("NPSQW", &mut rng), "NPSQW");
    }
}
