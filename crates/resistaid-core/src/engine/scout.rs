//! Run-level mutation analog and literature scouting.
//!
//! The scout runs once per pipeline run, before any candidate exists: it
//! gathers similar-mutation hits and mutation-specific literature, derives
//! the run's evidence score, and attaches the static clinical fact sheet.

use crate::core::retrieval::{Collection, FieldFilter, Hit, SemanticIndex};
use crate::engine::config::{ClinicalContext, DesignTables};
use crate::engine::synthesis::round3;
use serde::Serialize;
use tracing::{info, warn};

/// Evidence score assigned when neither analogs nor literature are found,
/// the documented default for novel mutations.
const NOVEL_MUTATION_SCORE: f64 = 0.3;
const ANALOG_LIMIT: usize = 5;
const LITERATURE_LIMIT: usize = 3;
/// Boost applied when both analog and literature signals are present.
const DUAL_SOURCE_BOOST: f64 = 1.1;

/// Run-level evidence gathered once per mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationAnalogResult {
    pub query_mutation: String,
    /// Similar-mutation hits, as returned by the index.
    pub analogs: Vec<Hit>,
    /// Mutation-filtered literature hits.
    pub literature: Vec<Hit>,
    /// Combined evidence score in `[0, 1]`.
    pub evidence_score: f64,
    pub clinical_context: ClinicalContext,
}

pub struct SimilarityScout<'a, I: SemanticIndex> {
    index: &'a I,
    tables: &'a DesignTables,
}

impl<'a, I: SemanticIndex> SimilarityScout<'a, I> {
    pub fn new(index: &'a I, tables: &'a DesignTables) -> Self {
        Self { index, tables }
    }

    pub fn scout(&self, mutation_id: &str) -> MutationAnalogResult {
        let analogs = self.search_or_empty(
            Collection::Mutations,
            &format!("HER2 mutation {mutation_id} resistance"),
            None,
            ANALOG_LIMIT,
        );

        let filter = FieldFilter::new("mutation_mentions", mutation_id);
        let literature = self.search_or_empty(
            Collection::Literature,
            &format!("HER2 {mutation_id} resistance mechanism"),
            Some(&filter),
            LITERATURE_LIMIT,
        );

        let evidence_score = evidence_score(&analogs, &literature);
        info!(
            mutation = %mutation_id,
            analogs = analogs.len(),
            papers = literature.len(),
            evidence_score,
            "analog scouting complete"
        );

        MutationAnalogResult {
            query_mutation: mutation_id.to_string(),
            analogs,
            literature,
            evidence_score,
            clinical_context: self.tables.clinical_context_for(mutation_id).clone(),
        }
    }

    fn search_or_empty(
        &self,
        collection: Collection,
        query: &str,
        filter: Option<&FieldFilter>,
        limit: usize,
    ) -> Vec<Hit> {
        match self.index.search(collection, query, filter, limit) {
            Ok(hits) => hits,
            Err(err) => {
                warn!(%err, ?collection, "retrieval failed, scouting continues without it");
                Vec::new()
            }
        }
    }
}

/// Weighted blend of mean similarity scores: literature counts for 60%,
/// analogs for 40%, with a capped 10% boost when both sources contribute.
/// Zero-valued similarity scores are treated as missing.
fn evidence_score(analogs: &[Hit], literature: &[Hit]) -> f64 {
    if analogs.is_empty() && literature.is_empty() {
        return NOVEL_MUTATION_SCORE;
    }

    let mean_of = |hits: &[Hit]| -> Option<f64> {
        let scores: Vec<f64> = hits.iter().map(|h| h.score).filter(|s| *s > 0.0).collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    };

    let analog_mean = mean_of(analogs);
    let literature_mean = mean_of(literature);

    let mut combined =
        0.6 * literature_mean.unwrap_or(0.0) + 0.4 * analog_mean.unwrap_or(0.0);
    if analog_mean.is_some() && literature_mean.is_some() {
        combined = (combined * DUAL_SOURCE_BOOST).min(1.0);
    }
    round3(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::mutation::MutationRecord;
    use crate::core::retrieval::{AbstractRecord, Record, RetrievalError};

    struct CannedIndex {
        mutations: Vec<Hit>,
        literature: Vec<Hit>,
    }

    impl SemanticIndex for CannedIndex {
        fn search(
            &self,
            collection: Collection,
            _query: &str,
            _filter: Option<&FieldFilter>,
            limit: usize,
        ) -> Result<Vec<Hit>, RetrievalError> {
            let hits = match collection {
                Collection::Mutations => &self.mutations,
                Collection::Literature => &self.literature,
                Collection::Antibodies => return Ok(Vec::new()),
            };
            Ok(hits.iter().take(limit).cloned().collect())
        }
    }

    struct FailingIndex;

    impl SemanticIndex for FailingIndex {
        fn search(
            &self,
            _collection: Collection,
            _query: &str,
            _filter: Option<&FieldFilter>,
            _limit: usize,
        ) -> Result<Vec<Hit>, RetrievalError> {
            Err(RetrievalError::Backend("index offline".to_string()))
        }
    }

    fn mutation_hit(id: &str, score: f64) -> Hit {
        Hit {
            score,
            record: Record::Mutation(MutationRecord {
                id: id.to_string(),
                domain: "Kinase domain".to_string(),
                clinical_significance: "Resistance".to_string(),
            }),
        }
    }

    fn literature_hit(id: &str, score: f64) -> Hit {
        Hit {
            score,
            record: Record::Literature(AbstractRecord {
                id: id.to_string(),
                title: "Resistance mechanisms".to_string(),
                text: String::new(),
                year: Some(2022),
                mutations: vec!["L755S".to_string()],
            }),
        }
    }

    #[test]
    fn empty_results_yield_the_novel_mutation_score() {
        let tables = DesignTables::default();
        let index = CannedIndex {
            mutations: Vec::new(),
            literature: Vec::new(),
        };
        let result = SimilarityScout::new(&index, &tables).scout("Q999Z");
        assert_eq!(result.evidence_score, 0.3);
        assert_eq!(result.clinical_context.prevalence, "Unknown");
    }

    #[test]
    fn retrieval_failure_is_treated_as_empty() {
        let tables = DesignTables::default();
        let result = SimilarityScout::new(&FailingIndex, &tables).scout("L755S");
        assert_eq!(result.evidence_score, 0.3);
        assert!(result.analogs.is_empty());
        assert!(result.literature.is_empty());
    }

    #[test]
    fn single_source_is_weighted_without_boost() {
        let tables = DesignTables::default();
        let index = CannedIndex {
            mutations: Vec::new(),
            literature: vec![literature_hit("PM1", 0.9), literature_hit("PM2", 0.7)],
        };
        let result = SimilarityScout::new(&index, &tables).scout("L755S");
        // 0.6 * mean(0.9, 0.7), no analog contribution, no boost.
        assert_eq!(result.evidence_score, 0.48);
    }

    #[test]
    fn dual_sources_get_the_capped_boost() {
        let tables = DesignTables::default();
        let index = CannedIndex {
            mutations: vec![mutation_hit("V777L", 0.5)],
            literature: vec![literature_hit("PM1", 0.5)],
        };
        let result = SimilarityScout::new(&index, &tables).scout("L755S");
        // (0.6 * 0.5 + 0.4 * 0.5) * 1.1 = 0.55.
        assert_eq!(result.evidence_score, 0.55);

        let saturated = CannedIndex {
            mutations: vec![mutation_hit("V777L", 1.0)],
            literature: vec![literature_hit("PM1", 1.0)],
        };
        let result = SimilarityScout::new(&saturated, &tables).scout("L755S");
        assert_eq!(result.evidence_score, 1.0, "boost is capped at 1.0");
    }

    #[test]
    fn zero_similarity_scores_are_treated_as_missing() {
        let tables = DesignTables::default();
        let index = CannedIndex {
            mutations: vec![mutation_hit("V777L", 0.0)],
            literature: vec![literature_hit("PM1", 0.8)],
        };
        let result = SimilarityScout::new(&index, &tables).scout("L755S");
        // The zero-scored analog neither contributes nor triggers the boost.
        assert_eq!(result.evidence_score, 0.48);
    }

    #[test]
    fn known_mutations_carry_their_fact_sheet() {
        let tables = DesignTables::default();
        let index = CannedIndex {
            mutations: Vec::new(),
            literature: Vec::new(),
        };
        let result = SimilarityScout::new(&index, &tables).scout("L755S");
        assert!(result.clinical_context.prevalence.contains("trastuzumab"));
    }
}
