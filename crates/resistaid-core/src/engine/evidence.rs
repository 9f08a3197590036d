//! Literature evidence linking for individual candidates.
//!
//! One retrieval call per candidate ties its loop3 binding motifs to
//! mutation-filtered literature; matching sentences become the candidate's
//! supporting statements and feed the scientific-support score. Retrieval
//! failures and empty result sets are valid degenerate cases, never errors.

use crate::core::models::candidate::Candidate;
use crate::core::retrieval::{Collection, FieldFilter, Hit, SemanticIndex};
use crate::engine::synthesis::round3;
use serde::Serialize;
use tracing::{debug, warn};

/// Support score assigned when retrieval yields nothing: a biologically
/// plausible design keeps a 0.4 baseline.
const BASELINE_SUPPORT: f64 = 0.4;
const MAX_STATEMENTS: usize = 3;
const STATEMENT_TRUNCATION: usize = 200;
const LITERATURE_LIMIT: usize = 5;

/// Coarse confidence label derived from the supporting-record count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SupportConfidence {
    High,
    Medium,
    Low,
}

impl SupportConfidence {
    fn from_record_count(count: usize) -> Self {
        if count > 2 {
            Self::High
        } else if count > 0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Literature backing for one candidate, derived and immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceLink {
    /// Scientific-support score in `[0, 1]`.
    pub support_score: f64,
    /// Identifiers of the supporting literature records.
    pub supporting_records: Vec<String>,
    /// Up to three extracted evidence sentences.
    pub statements: Vec<String>,
    pub confidence: SupportConfidence,
}

pub struct EvidenceLinker<'a, I: SemanticIndex> {
    index: &'a I,
}

impl<'a, I: SemanticIndex> EvidenceLinker<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    pub fn link(&self, mutation_id: &str, candidate: &Candidate) -> EvidenceLink {
        let motifs = key_motifs(candidate);
        let query = format!(
            "HER2 {} antibody binding {}",
            mutation_id,
            motifs.join(", ")
        );
        let filter = FieldFilter::new("mutation_mentions", mutation_id);

        let papers = match self
            .index
            .search(Collection::Literature, &query, Some(&filter), LITERATURE_LIMIT)
        {
            Ok(hits) => hits,
            Err(err) => {
                warn!(%err, candidate = %candidate.id, "literature retrieval failed, linking without evidence");
                Vec::new()
            }
        };

        let statements = extract_statements(&papers, mutation_id);
        let support_score = support_score(
            papers.len(),
            statements.len(),
            candidate.metrics.confidence,
        );
        debug!(
            candidate = %candidate.id,
            papers = papers.len(),
            statements = statements.len(),
            support_score,
            "evidence linked"
        );

        EvidenceLink {
            support_score,
            supporting_records: papers.iter().map(|h| h.record_id().to_string()).collect(),
            statements,
            confidence: SupportConfidence::from_record_count(papers.len()),
        }
    }
}

/// Distinct loop3 aromatic residues, sorted for deterministic queries.
fn key_motifs(candidate: &Candidate) -> Vec<String> {
    let mut motifs: Vec<u8> = candidate
        .loop3
        .bytes()
        .filter(|&aa| matches!(aa, b'F' | b'W' | b'Y'))
        .collect();
    motifs.sort_unstable();
    motifs.dedup();
    motifs.into_iter().map(|aa| (aa as char).to_string()).collect()
}

/// Sentences mentioning both the mutation and a binding/affinity keyword,
/// truncated, deduplicated in order, and capped at [`MAX_STATEMENTS`].
fn extract_statements(papers: &[Hit], mutation_id: &str) -> Vec<String> {
    let mutation_lower = mutation_id.to_lowercase();
    let mut statements: Vec<String> = Vec::new();

    for paper in papers.iter().filter_map(Hit::as_literature) {
        for sentence in paper.text.split(". ") {
            let lower = sentence.to_lowercase();
            if lower.contains(&mutation_lower)
                && (lower.contains("binding") || lower.contains("affinity"))
            {
                let truncated: String = sentence.chars().take(STATEMENT_TRUNCATION).collect();
                let statement = format!("{truncated}...");
                if !statements.contains(&statement) {
                    statements.push(statement);
                }
            }
        }
    }

    statements.truncate(MAX_STATEMENTS);
    statements
}

fn support_score(paper_count: usize, statement_count: usize, design_confidence: f64) -> f64 {
    if paper_count == 0 {
        return BASELINE_SUPPORT;
    }
    let base = (BASELINE_SUPPORT + 0.1 * paper_count as f64 + 0.05 * statement_count as f64)
        .min(0.95);
    round3(0.7 * base + 0.3 * design_confidence)
}
