//! In-process lexical retrieval index.
//!
//! A deliberately simple stand-in for the semantic retrieval service: every
//! record is reduced to a token set, queries are scored by normalized token
//! overlap, and exact-match field filters narrow the candidate set first.
//! The core pipeline only depends on the [`SemanticIndex`] contract, so a
//! real vector backend can replace this without touching the core.

use crate::data::RecordStore;
use resistaid::core::retrieval::{
    Collection, FieldFilter, Hit, Record, RetrievalError, SemanticIndex,
};
use std::collections::HashSet;

struct IndexedRecord {
    record: Record,
    tokens: HashSet<String>,
}

pub struct LexicalIndex {
    mutations: Vec<IndexedRecord>,
    antibodies: Vec<IndexedRecord>,
    abstracts: Vec<IndexedRecord>,
}

impl LexicalIndex {
    pub fn build(store: &RecordStore) -> Self {
        let mutations = store
            .mutations
            .iter()
            .map(|m| IndexedRecord {
                tokens: tokenize(&format!(
                    "{} {} {}",
                    m.id, m.domain, m.clinical_significance
                )),
                record: Record::Mutation(m.clone()),
            })
            .collect();

        let antibodies = store
            .antibodies
            .iter()
            .map(|a| IndexedRecord {
                tokens: tokenize(&format!("{} {} {}", a.name, a.loop3, a.source)),
                record: Record::Antibody(a.clone()),
            })
            .collect();

        let abstracts = store
            .abstracts
            .iter()
            .map(|p| IndexedRecord {
                tokens: tokenize(&format!(
                    "{} {} {}",
                    p.title,
                    p.text,
                    p.mutations.join(" ")
                )),
                record: Record::Literature(p.clone()),
            })
            .collect();

        Self {
            mutations,
            antibodies,
            abstracts,
        }
    }

    fn records(&self, collection: Collection) -> &[IndexedRecord] {
        match collection {
            Collection::Mutations => &self.mutations,
            Collection::Antibodies => &self.antibodies,
            Collection::Literature => &self.abstracts,
        }
    }
}

impl SemanticIndex for LexicalIndex {
    fn search(
        &self,
        collection: Collection,
        query: &str,
        filter: Option<&FieldFilter>,
        limit: usize,
    ) -> Result<Vec<Hit>, RetrievalError> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<Hit> = Vec::new();
        for indexed in self.records(collection) {
            if let Some(filter) = filter {
                if !matches_filter(&indexed.record, collection, filter)? {
                    continue;
                }
            }
            let score = overlap_score(&query_tokens, &indexed.tokens);
            if score > 0.0 {
                hits.push(Hit {
                    score,
                    record: indexed.record.clone(),
                });
            }
        }

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }
}

/// Normalized token overlap in `[0, 1]`.
fn overlap_score(query: &HashSet<String>, document: &HashSet<String>) -> f64 {
    if query.is_empty() || document.is_empty() {
        return 0.0;
    }
    let shared = query.intersection(document).count();
    shared as f64 / (query.len() as f64 * document.len() as f64).sqrt()
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| t.len() >= 2)
        .map(str::to_lowercase)
        .collect()
}

fn matches_filter(
    record: &Record,
    collection: Collection,
    filter: &FieldFilter,
) -> Result<bool, RetrievalError> {
    match (record, filter.field.as_str()) {
        (Record::Mutation(m), "mutation_id") => Ok(m.id == filter.value),
        (Record::Antibody(a), "name") => Ok(a.name == filter.value),
        (Record::Antibody(a), "antibody_id") => Ok(a.id == filter.value),
        (Record::Literature(p), "mutation_mentions") => {
            Ok(p.mutations.iter().any(|m| m == &filter.value))
        }
        _ => Err(RetrievalError::UnsupportedFilterField {
            collection,
            field: filter.field.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resistaid::core::models::mutation::MutationRecord;
    use resistaid::core::retrieval::{AbstractRecord, AntibodyRecord};

    fn store() -> RecordStore {
        RecordStore {
            mutations: vec![
                MutationRecord {
                    id: "L755S".to_string(),
                    domain: "Kinase domain".to_string(),
                    clinical_significance: "Resistance".to_string(),
                },
                MutationRecord {
                    id: "D769H".to_string(),
                    domain: "Kinase domain".to_string(),
                    clinical_significance: "Likely resistance".to_string(),
                },
            ],
            antibodies: vec![AntibodyRecord {
                id: "AB001".to_string(),
                name: "trastuzumab".to_string(),
                loop3: "SRWGGDGFYAMDY".to_string(),
                affinity_nm: Some(5.0),
                source: "therapeutic".to_string(),
            }],
            abstracts: vec![
                AbstractRecord {
                    id: "PM1".to_string(),
                    title: "L755S resistance mechanism".to_string(),
                    text: "The L755S mutation reduced trastuzumab binding affinity.".to_string(),
                    year: Some(2021),
                    mutations: vec!["L755S".to_string()],
                },
                AbstractRecord {
                    id: "PM2".to_string(),
                    title: "Unrelated kinase review".to_string(),
                    text: "A broad review of kinase biology.".to_string(),
                    year: Some(2019),
                    mutations: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn queries_rank_matching_records_first() {
        let index = LexicalIndex::build(&store());
        let hits = index
            .search(Collection::Literature, "L755S binding affinity", None, 5)
            .unwrap();
        assert!(!hits.is_empty());
        assert_eq!(hits[0].record_id(), "PM1");
        for hit in &hits {
            assert!(hit.score > 0.0 && hit.score <= 1.0);
        }
    }

    #[test]
    fn mutation_filter_excludes_unrelated_literature() {
        let index = LexicalIndex::build(&store());
        let filter = FieldFilter::new("mutation_mentions", "L755S");
        let hits = index
            .search(Collection::Literature, "kinase review", Some(&filter), 5)
            .unwrap();
        assert!(hits.iter().all(|h| h.record_id() == "PM1"));
    }

    #[test]
    fn limit_caps_the_result_count() {
        let index = LexicalIndex::build(&store());
        let hits = index
            .search(Collection::Mutations, "kinase domain resistance", None, 1)
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn unknown_filter_field_is_rejected() {
        let index = LexicalIndex::build(&store());
        let filter = FieldFilter::new("year", "2021");
        let result = index.search(Collection::Literature, "kinase", Some(&filter), 5);
        assert!(matches!(
            result,
            Err(RetrievalError::UnsupportedFilterField { .. })
        ));
    }

    #[test]
    fn empty_query_returns_no_hits() {
        let index = LexicalIndex::build(&store());
        let hits = index.search(Collection::Mutations, "??", None, 5).unwrap();
        assert!(hits.is_empty());
    }
}
