//! Stochastic, motif-biased candidate synthesis.
//!
//! Generation follows a generate-then-repair pattern: raw loop regions are
//! drawn from mutation-biased residue distributions, passed through the
//! [`repair`] rules, and assembled into a fixed scaffold. All randomness
//! flows through the caller-supplied [`Rng`], so a fixed seed reproduces a
//! run exactly.

pub mod repair;

use crate::core::chem::{classes, tables};
use crate::core::models::candidate::{Candidate, CompositionSummary, DesignMetrics};
use crate::engine::config::{DesignTables, Framework};
use rand::Rng;
use rand::seq::SliceRandom;
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Second framework-region literal, between loop1 and loop2.
pub const FRAMEWORK_2: &str = "WVRQAPGKGLEWV";
/// Third framework-region literal, between loop2 and loop3.
pub const FRAMEWORK_3: &str = "RFTISADTSKNTAYLQMNSLRAEDTAVYYC";
/// Fourth framework-region literal, closing the domain after loop3.
pub const FRAMEWORK_4: &str = "WGQGTLVTVSS";

pub const LOOP1_LENGTH: usize = 10;
pub const LOOP2_LENGTH: usize = 16;
pub const LOOP3_MIN_LENGTH: usize = 8;
pub const LOOP3_MAX_LENGTH: usize = 15;

/// Probability that a loop1/loop2 position is drawn from the mutation's
/// preferred residues rather than the region pool.
const PREFERRED_BIAS: f64 = 0.6;
/// Preferred-residue bias for interior loop3 positions.
const LOOP3_INTERIOR_BIAS: f64 = 0.8;
/// Per-position mutation rate applied to a donated loop3 template.
const TEMPLATE_MUTATION_RATE: f64 = 0.4;

/// Fallback preferred residues for loop1/loop2 when the mutation is unknown.
const DEFAULT_LOOP_MOTIF: &[u8] = classes::AROMATIC;
/// Fallback preferred residues for de-novo loop3 synthesis.
const DEFAULT_LOOP3_MOTIF: &[u8] = b"YRDW";
/// Fallback preferred residues for template mutation.
const DEFAULT_TEMPLATE_MOTIF: &[u8] = b"YRD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopRegion {
    One,
    Two,
}

/// Generates candidate variable-domain sequences for one mutation.
pub struct SequenceSynthesizer<'a> {
    tables: &'a DesignTables,
}

impl<'a> SequenceSynthesizer<'a> {
    pub fn new(tables: &'a DesignTables) -> Self {
        Self { tables }
    }

    /// Synthesizes `count` candidates, sorted by descending design
    /// confidence.
    ///
    /// Unknown mutation identifiers are never an error: every biased draw
    /// falls back to its default residue table. When `template_loop3` is
    /// given, loop3 is derived from it by biased point mutation; otherwise
    /// loop3 is synthesized de novo.
    #[instrument(skip_all, fields(mutation = %mutation_id, count))]
    pub fn synthesize(
        &self,
        mutation_id: &str,
        template_loop3: Option<&str>,
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = (0..count)
            .map(|ordinal| self.build_candidate(mutation_id, template_loop3, ordinal + 1, rng))
            .collect();

        candidates.sort_by(|a, b| {
            b.metrics
                .confidence
                .partial_cmp(&a.metrics.confidence)
                .unwrap_or(Ordering::Equal)
        });
        debug!(generated = candidates.len(), "candidate synthesis complete");
        candidates
    }

    fn build_candidate(
        &self,
        mutation_id: &str,
        template_loop3: Option<&str>,
        ordinal: usize,
        rng: &mut impl Rng,
    ) -> Candidate {
        let framework = self.select_framework(mutation_id, rng);
        let loop1 = self.generate_loop(mutation_id, LoopRegion::One, rng);
        let loop2 = self.generate_loop(mutation_id, LoopRegion::Two, rng);
        let loop3 = match template_loop3 {
            Some(template) => self.mutate_template(template, mutation_id, rng),
            None => self.generate_loop3(mutation_id, rng),
        };

        let sequence = assemble(&framework.fr1, &loop1, &loop2, &loop3);
        let metrics = self.design_metrics(&sequence, &loop3, mutation_id);

        Candidate {
            id: Candidate::derive_id(mutation_id, ordinal, &sequence),
            composition: CompositionSummary::of(&sequence),
            dna: tables::back_translate(&sequence),
            framework: framework.name.clone(),
            sequence,
            loop1,
            loop2,
            loop3,
            metrics,
        }
    }

    /// Kinase-domain resistance mutations draw from the stability-favoring
    /// framework subset; everything else draws uniformly from the pool.
    fn select_framework(&self, mutation_id: &str, rng: &mut impl Rng) -> &Framework {
        let pool: Vec<&Framework> = if self
            .tables
            .stability_biased_mutations
            .iter()
            .any(|m| m == mutation_id)
        {
            self.tables
                .frameworks
                .iter()
                .filter(|f| self.tables.stability_framework_names.contains(&f.name))
                .collect()
        } else {
            self.tables.frameworks.iter().collect()
        };

        pool.choose(rng)
            .copied()
            .unwrap_or(&self.tables.frameworks[0])
    }

    fn generate_loop(&self, mutation_id: &str, region: LoopRegion, rng: &mut impl Rng) -> String {
        let preferred = self
            .tables
            .motif_for(mutation_id)
            .unwrap_or(DEFAULT_LOOP_MOTIF);

        // Region pools keep the duplicate members of overlapping classes,
        // which weights the shared residues accordingly.
        let (length, pool): (usize, Vec<u8>) = match region {
            LoopRegion::One => (
                LOOP1_LENGTH,
                [classes::POLAR, classes::SMALL].concat(),
            ),
            LoopRegion::Two => (
                LOOP2_LENGTH,
                [classes::HYDROPHILIC, classes::HYDROPHOBIC].concat(),
            ),
        };

        let mut raw = Vec::with_capacity(length);
        for _ in 0..length {
            let source = if rng.gen_bool(PREFERRED_BIAS) {
                preferred
            } else {
                pool.as_slice()
            };
            raw.push(choose_residue(source, rng));
        }

        repair::repair(&bytes_to_string(raw), rng)
    }

    fn generate_loop3(&self, mutation_id: &str, rng: &mut impl Rng) -> String {
        let preferred = self
            .tables
            .motif_for(mutation_id)
            .unwrap_or(DEFAULT_LOOP3_MOTIF);
        let length = rng.gen_range(LOOP3_MIN_LENGTH..=LOOP3_MAX_LENGTH);

        let mut raw = Vec::with_capacity(length);
        for i in 0..length {
            let aa = if i < 2 || i > length - 3 {
                // Edge positions stay flexible.
                choose_residue(classes::SMALL, rng)
            } else if rng.gen_bool(LOOP3_INTERIOR_BIAS) {
                choose_residue(preferred, rng)
            } else if rng.gen_bool(0.5) {
                choose_residue(classes::CHARGED_POSITIVE, rng)
            } else {
                choose_residue(classes::AROMATIC, rng)
            };
            raw.push(aa);
        }

        repair::repair(&bytes_to_string(raw), rng)
    }

    fn mutate_template(&self, template: &str, mutation_id: &str, rng: &mut impl Rng) -> String {
        let preferred = self
            .tables
            .motif_for(mutation_id)
            .unwrap_or(DEFAULT_TEMPLATE_MOTIF);

        let mutated: Vec<u8> = template
            .bytes()
            .map(|aa| {
                if rng.gen_bool(TEMPLATE_MUTATION_RATE) {
                    choose_residue(preferred, rng)
                } else {
                    aa
                }
            })
            .collect();

        repair::repair(&bytes_to_string(mutated), rng)
    }

    fn design_metrics(&self, sequence: &str, loop3: &str, mutation_id: &str) -> DesignMetrics {
        let mut confidence: f64 = 0.5;

        let loop3_len = loop3.len();
        if (8..=12).contains(&loop3_len) {
            confidence += 0.2;
        } else if (6..=14).contains(&loop3_len) {
            confidence += 0.1;
        }

        let cysteines = classes::count_residue(sequence, b'C');
        if cysteines % 2 == 0 && cysteines >= 2 {
            confidence += 0.15;
        } else if cysteines % 2 == 0 {
            confidence += 0.1;
        } else {
            // Unpaired cysteines undercut the whole design.
            confidence *= 0.7;
        }

        let loop3_aromatics = classes::count_in_class(loop3, classes::AROMATIC);
        if loop3_aromatics >= 2 {
            confidence += 0.15;
        } else if loop3_aromatics >= 1 {
            confidence += 0.05;
        }

        let preferred = self.tables.motif_for(mutation_id).unwrap_or(b"");
        let preferred_hits = loop3.bytes().filter(|aa| preferred.contains(aa)).count();
        let binding_optimization =
            (preferred_hits as f64 / loop3_len.max(1) as f64).min(1.0);

        let hydrophobic_fraction = classes::class_fraction(sequence, classes::HYDROPHOBIC);
        let stability = 0.5 + 0.5 * (0.3 - (0.3 - hydrophobic_fraction).abs());

        let charged_fraction = classes::class_fraction(sequence, classes::CHARGED);
        let specificity = 1.0 - ((0.15 - charged_fraction).abs() / 0.15).min(1.0);

        DesignMetrics {
            confidence: confidence.clamp(0.3, 0.95),
            binding_optimization: round3(binding_optimization),
            stability: round3(stability),
            specificity: round3(specificity),
        }
    }
}

fn assemble(fr1: &str, loop1: &str, loop2: &str, loop3: &str) -> String {
    let mut sequence = String::with_capacity(
        fr1.len()
            + loop1.len()
            + FRAMEWORK_2.len()
            + loop2.len()
            + FRAMEWORK_3.len()
            + loop3.len()
            + FRAMEWORK_4.len(),
    );
    sequence.push_str(fr1);
    sequence.push_str(loop1);
    sequence.push_str(FRAMEWORK_2);
    sequence.push_str(loop2);
    sequence.push_str(FRAMEWORK_3);
    sequence.push_str(loop3);
    sequence.push_str(FRAMEWORK_4);
    sequence
}

fn choose_residue(pool: &[u8], rng: &mut impl Rng) -> u8 {
    pool.choose(rng).copied().unwrap_or(b'A')
}

fn bytes_to_string(bytes: Vec<u8>) -> String {
    bytes.into_iter().map(char::from).collect()
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
