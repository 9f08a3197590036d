//! The complete design run: scout, synthesize, assess, rank, report.
//!
//! One call to [`run`] executes the whole pipeline for a single mutation,
//! strictly sequentially: the scout queries once, the synthesizer produces
//! the candidate batch, and each candidate is assessed independently before
//! everything folds into a ranked [`Report`]. The report is returned to the
//! caller; persistence is the caller's concern.

use crate::core::retrieval::{Collection, SemanticIndex};
use crate::engine::config::{DesignTables, PipelineConfig};
use crate::engine::error::EngineError;
use crate::engine::evidence::{EvidenceLink, EvidenceLinker};
use crate::engine::feasibility::{FeasibilityEvaluator, FeasibilityReport};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scout::{MutationAnalogResult, SimilarityScout};
use crate::engine::synthesis::SequenceSynthesizer;
use crate::core::models::candidate::Candidate;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{info, instrument, warn};

const TOP_CANDIDATES: usize = 3;
const TEMPLATE_LIMIT: usize = 3;

/// One fully assessed candidate with its final combined score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub feasibility: FeasibilityReport,
    pub evidence: EvidenceLink,
    /// Run-level evidence score, shared by every candidate of the run.
    pub evidence_score: f64,
    pub combined_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub candidates_generated: usize,
    pub top_score: f64,
    pub average_feasibility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceSummary {
    pub similar_mutations: usize,
    pub relevant_papers: usize,
    pub evidence_score: f64,
}

/// Final run report. `top_candidates` holds exactly the highest-scoring
/// candidates (at most three), stable-sorted by descending combined score;
/// the summary statistics cover the full generated batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub id: String,
    pub mutation: String,
    pub timestamp: DateTime<Utc>,
    pub summary: RunSummary,
    pub evidence_found: EvidenceSummary,
    pub scouting: MutationAnalogResult,
    pub top_candidates: Vec<RankedCandidate>,
    pub recommendations: Vec<String>,
}

/// Runs the full design pipeline for `mutation_id`.
///
/// # Errors
///
/// Fails only on invalid caller input: an empty mutation identifier or a
/// zero candidate count. Retrieval failures and unknown mutations degrade
/// to their documented fallbacks instead.
#[instrument(skip_all, fields(mutation = %mutation_id))]
pub fn run<I: SemanticIndex>(
    index: &I,
    mutation_id: &str,
    config: &PipelineConfig,
    tables: &DesignTables,
    rng: &mut impl Rng,
    reporter: &ProgressReporter,
) -> Result<Report, EngineError> {
    if mutation_id.trim().is_empty() {
        return Err(EngineError::EmptyMutationId);
    }
    if config.candidate_count == 0 {
        return Err(EngineError::InvalidCandidateCount);
    }

    // === Phase 1: Run-level evidence scouting ===
    reporter.report(Progress::PhaseStart {
        name: "Evidence scouting",
    });
    let scouting = SimilarityScout::new(index, tables).scout(mutation_id);
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Template selection from known antibodies ===
    reporter.report(Progress::PhaseStart {
        name: "Template selection",
    });
    let template = select_template(index, mutation_id);
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Candidate synthesis ===
    reporter.report(Progress::PhaseStart {
        name: "Sequence synthesis",
    });
    let candidates = SequenceSynthesizer::new(tables).synthesize(
        mutation_id,
        template.as_deref(),
        config.candidate_count,
        rng,
    );
    info!(count = candidates.len(), "candidates synthesized");
    reporter.report(Progress::PhaseFinish);

    // === Phase 4: Per-candidate assessment ===
    reporter.report(Progress::PhaseStart {
        name: "Candidate assessment",
    });
    reporter.report(Progress::CandidateQueue {
        total: candidates.len() as u64,
    });
    let evaluator = FeasibilityEvaluator::new(tables);
    let linker = EvidenceLinker::new(index);
    let weights = &config.weights;

    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let feasibility = evaluator.evaluate(&candidate);
            let evidence = linker.link(mutation_id, &candidate);
            let combined_score = weights.support * evidence.support_score
                + weights.evidence * scouting.evidence_score
                + weights.design * candidate.metrics.confidence
                + weights.feasibility * feasibility.score;
            reporter.report(Progress::CandidateScored);
            RankedCandidate {
                candidate,
                feasibility,
                evidence,
                evidence_score: scouting.evidence_score,
                combined_score,
            }
        })
        .collect();
    reporter.report(Progress::PhaseFinish);

    // === Phase 5: Ranking and report assembly ===
    sort_by_combined_score(&mut ranked);
    let report = assemble_report(mutation_id, ranked, scouting);
    reporter.report(Progress::Message(format!(
        "Top combined score: {:.3}",
        report.summary.top_score
    )));
    Ok(report)
}

/// Best-matching known antibody loop3, used as the synthesis template.
fn select_template<I: SemanticIndex>(index: &I, mutation_id: &str) -> Option<String> {
    let query = format!("Antibodies targeting HER2 with mutation {mutation_id}");
    let hits = match index.search(Collection::Antibodies, &query, None, TEMPLATE_LIMIT) {
        Ok(hits) => hits,
        Err(err) => {
            warn!(%err, "antibody retrieval failed, designing without a template");
            return None;
        }
    };

    let template = hits
        .iter()
        .filter_map(|hit| hit.as_antibody())
        .map(|record| record.loop3.clone())
        .find(|loop3| !loop3.is_empty());
    match &template {
        Some(loop3) => info!(template = %loop3, "using donated loop3 template"),
        None => info!("no usable antibody template, synthesizing de novo"),
    }
    template
}

/// Stable descending sort; candidates with equal combined scores keep their
/// synthesis order.
fn sort_by_combined_score(ranked: &mut [RankedCandidate]) {
    ranked.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(Ordering::Equal)
    });
}

fn assemble_report(
    mutation_id: &str,
    ranked: Vec<RankedCandidate>,
    scouting: MutationAnalogResult,
) -> Report {
    let timestamp = Utc::now();
    let candidates_generated = ranked.len();
    let top_score = ranked.first().map_or(0.0, |c| c.combined_score);
    let average_feasibility = if ranked.is_empty() {
        0.0
    } else {
        ranked.iter().map(|c| c.feasibility.score).sum::<f64>() / ranked.len() as f64
    };

    let evidence_found = EvidenceSummary {
        similar_mutations: scouting.analogs.len(),
        relevant_papers: scouting.literature.len(),
        evidence_score: scouting.evidence_score,
    };

    let mut top_candidates = ranked;
    top_candidates.truncate(TOP_CANDIDATES);
    let recommendations = run_recommendations(&top_candidates);

    Report {
        id: format!("{}_{}", mutation_id, timestamp.format("%Y%m%d_%H%M%S")),
        mutation: mutation_id.to_string(),
        timestamp,
        summary: RunSummary {
            candidates_generated,
            top_score,
            average_feasibility,
        },
        evidence_found,
        scouting,
        top_candidates,
        recommendations,
    }
}

fn run_recommendations(top_candidates: &[RankedCandidate]) -> Vec<String> {
    if top_candidates.is_empty() {
        return vec!["No viable candidates generated - consider different approach".to_string()];
    }

    let mut recommendations = Vec::new();

    if let Some(best) = top_candidates.iter().find(|c| c.feasibility.score >= 0.8) {
        recommendations.push(format!(
            "Prioritize {} for synthesis (Feasibility: {:.2}, Combined Score: {:.2})",
            best.candidate.id, best.feasibility.score, best.combined_score
        ));
    }

    let mut common_issues: Vec<&str> = Vec::new();
    for candidate in top_candidates.iter().take(2) {
        for issue in candidate.feasibility.issues() {
            if !common_issues.contains(&issue) {
                common_issues.push(issue);
            }
        }
    }
    if !common_issues.is_empty() {
        let shown: Vec<&str> = common_issues.iter().take(2).copied().collect();
        recommendations.push(format!("Common issues to address: {}", shown.join(", ")));
    }

    recommendations.push("Consider in vitro testing for top 2-3 candidates".to_string());
    recommendations.push("Validate binding with computational docking before synthesis".to_string());
    recommendations
}
