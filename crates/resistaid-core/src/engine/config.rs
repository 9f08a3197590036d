//! Pipeline configuration.
//!
//! [`DesignTables`] carries every tunable domain table (framework pool,
//! motif preferences, denylist, clinical facts) as an injected value with a
//! production [`Default`], so tests can swap tables without touching any
//! global state. [`PipelineConfig`] carries the run parameters and ranking
//! weights, built through the usual builder.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Ranking weights must sum to 1.0 (got {0})")]
    UnnormalizedWeights(f64),
}

/// One framework template: a germline name and its first framework region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framework {
    pub name: String,
    /// First framework-region literal preceding loop1.
    pub fr1: String,
}

impl Framework {
    fn new(name: &str, fr1: &str) -> Self {
        Self {
            name: name.to_string(),
            fr1: fr1.to_string(),
        }
    }
}

/// Static clinical fact sheet for one mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClinicalContext {
    pub prevalence: String,
    pub clinical_impact: String,
    pub treatment_implications: String,
    pub prognosis: String,
}

/// Injected domain tables used across the pipeline stages.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignTables {
    /// Framework template pool.
    pub frameworks: Vec<Framework>,
    /// Mutation ids whose framework draw is restricted to
    /// [`stability_framework_names`](Self::stability_framework_names).
    pub stability_biased_mutations: Vec<String>,
    /// Names of the stability-favoring framework subset.
    pub stability_framework_names: Vec<String>,
    /// Mutation id to preferred binding residues.
    pub binding_motifs: HashMap<String, Vec<u8>>,
    /// Sequence motifs that disqualify a candidate region outright.
    pub denylist_motifs: Vec<String>,
    /// Mutation id to clinical fact sheet.
    pub clinical_contexts: HashMap<String, ClinicalContext>,
    /// Fact sheet returned for mutations absent from
    /// [`clinical_contexts`](Self::clinical_contexts).
    pub unknown_mutation_context: ClinicalContext,
}

impl DesignTables {
    /// Preferred binding residues for a mutation, or `None` when unknown.
    pub fn motif_for(&self, mutation_id: &str) -> Option<&[u8]> {
        self.binding_motifs.get(mutation_id).map(Vec::as_slice)
    }

    pub fn clinical_context_for(&self, mutation_id: &str) -> &ClinicalContext {
        self.clinical_contexts
            .get(mutation_id)
            .unwrap_or(&self.unknown_mutation_context)
    }
}

impl Default for DesignTables {
    fn default() -> Self {
        let binding_motifs = HashMap::from([
            ("L755S".to_string(), b"YFWRH".to_vec()),
            ("T798I".to_string(), b"DESTQ".to_vec()),
            ("D769H".to_string(), b"STNQY".to_vec()),
            ("V777L".to_string(), b"YWFHR".to_vec()),
        ]);

        let clinical_contexts = HashMap::from([
            (
                "L755S".to_string(),
                ClinicalContext {
                    prevalence: "5-7% of trastuzumab-resistant cases".to_string(),
                    clinical_impact: "Reduces drug binding affinity by 50-100x".to_string(),
                    treatment_implications: "Consider T-DM1 or neratinib".to_string(),
                    prognosis: "Worse progression-free survival".to_string(),
                },
            ),
            (
                "T798I".to_string(),
                ClinicalContext {
                    prevalence: "2-3% of resistant cases".to_string(),
                    clinical_impact: "Gatekeeper mutation, affects multiple TKIs".to_string(),
                    treatment_implications: "Avoid lapatinib/neratinib".to_string(),
                    prognosis: "Requires novel antibody approaches".to_string(),
                },
            ),
            (
                "D769H".to_string(),
                ClinicalContext {
                    prevalence: "3-4% of resistant cases".to_string(),
                    clinical_impact: "Alters activation loop dynamics".to_string(),
                    treatment_implications: "May respond to higher antibody doses".to_string(),
                    prognosis: "Variable response to second-line therapies".to_string(),
                },
            ),
        ]);

        Self {
            frameworks: vec![
                Framework::new("VH3-23", "EVQLVESGGGLVQPGGSLRLSCAAS"),
                Framework::new("VH1-69", "QVQLVQSGAEVKKPGASVKVSCKAS"),
                Framework::new("VH4-34", "QVQLQESGPGLVKPSETLSLTCTVS"),
                Framework::new("VH3-07", "EVQLVESGGGLVQPGKSLRLSCAAS"),
            ],
            stability_biased_mutations: vec!["L755S".to_string(), "T798I".to_string()],
            stability_framework_names: vec!["VH3-23".to_string(), "VH4-34".to_string()],
            binding_motifs,
            denylist_motifs: [
                "CCC", "WWW", "KKKK", "DDDD", "EEEE", "RRRR", "GPGG", "GPGP", "NGS", "NGT", "NGA",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
            clinical_contexts,
            unknown_mutation_context: ClinicalContext {
                prevalence: "Unknown".to_string(),
                clinical_impact: "Novel mutation - limited data".to_string(),
                treatment_implications: "Consider experimental approaches".to_string(),
                prognosis: "Requires monitoring".to_string(),
            },
        }
    }
}

/// Weights of the final combined ranking score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    pub support: f64,
    pub evidence: f64,
    pub design: f64,
    pub feasibility: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            support: 0.3,
            evidence: 0.1,
            design: 0.3,
            feasibility: 0.3,
        }
    }
}

impl RankingWeights {
    pub fn sum(&self) -> f64 {
        self.support + self.evidence + self.design + self.feasibility
    }
}

/// Parameters of one design run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub candidate_count: usize,
    pub weights: RankingWeights,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            candidate_count: 3,
            weights: RankingWeights::default(),
        }
    }
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    candidate_count: Option<usize>,
    weights: Option<RankingWeights>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidate_count(mut self, count: usize) -> Self {
        self.candidate_count = Some(count);
        self
    }

    pub fn weights(mut self, weights: RankingWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let weights = self.weights.unwrap_or_default();
        let sum = weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::UnnormalizedWeights(sum));
        }
        Ok(PipelineConfig {
            candidate_count: self.candidate_count.unwrap_or(3),
            weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_cover_the_canonical_mutations() {
        let tables = DesignTables::default();
        for id in ["L755S", "T798I", "D769H", "V777L"] {
            assert!(tables.motif_for(id).is_some(), "missing motif for {id}");
        }
        assert_eq!(tables.frameworks.len(), 4);
        assert_eq!(tables.denylist_motifs.len(), 11);
    }

    #[test]
    fn unknown_mutation_falls_back_to_the_fixed_context() {
        let tables = DesignTables::default();
        let context = tables.clinical_context_for("Q999Z");
        assert_eq!(context.prevalence, "Unknown");
        assert!(tables.motif_for("Q999Z").is_none());
    }

    #[test]
    fn builder_defaults_match_the_documented_run_shape() {
        let config = PipelineConfigBuilder::new().build().unwrap();
        assert_eq!(config.candidate_count, 3);
        assert_eq!(config.weights, RankingWeights::default());
    }

    #[test]
    fn builder_rejects_unnormalized_weights() {
        let result = PipelineConfigBuilder::new()
            .weights(RankingWeights {
                support: 0.5,
                evidence: 0.5,
                design: 0.5,
                feasibility: 0.5,
            })
            .build();
        assert_eq!(result, Err(ConfigError::UnnormalizedWeights(2.0)));
    }
}
