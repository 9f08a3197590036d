//! The semantic-retrieval collaborator abstraction.
//!
//! The pipeline consumes exactly one external capability: similarity search
//! over fixed record collections, with an optional exact-match field filter.
//! Implementations own collection lifecycle, embedding, and transport; the
//! core treats the index as a black box behind [`SemanticIndex`].

use crate::core::models::mutation::MutationRecord;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("retrieval backend error: {0}")]
    Backend(String),

    #[error("collection {collection:?} does not support filtering on field '{field}'")]
    UnsupportedFilterField {
        collection: Collection,
        field: String,
    },
}

/// The fixed record collections the pipeline queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Collection {
    Mutations,
    Antibodies,
    Literature,
}

/// Exact-match predicate on one payload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A known antibody record from the antibody collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AntibodyRecord {
    pub id: String,
    pub name: String,
    /// Third hypervariable loop, the template donor for synthesis.
    pub loop3: String,
    /// Reported binding affinity in nanomolar, when known.
    pub affinity_nm: Option<f64>,
    pub source: String,
}

/// A literature abstract record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbstractRecord {
    /// Stable literature identifier (e.g. a PubMed id).
    pub id: String,
    pub title: String,
    pub text: String,
    pub year: Option<u16>,
    /// Mutation identifiers mentioned in the abstract.
    pub mutations: Vec<String>,
}

/// Payload of one search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Record {
    Mutation(MutationRecord),
    Antibody(AntibodyRecord),
    Literature(AbstractRecord),
}

/// One similarity-ranked search result.
///
/// Scores are approximately in `[0, 1]` but carry no hard guarantee; the
/// pipeline only relies on relative ordering and treats the magnitude as a
/// heuristic signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub score: f64,
    pub record: Record,
}

impl Hit {
    pub fn as_literature(&self) -> Option<&AbstractRecord> {
        match &self.record {
            Record::Literature(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_antibody(&self) -> Option<&AntibodyRecord> {
        match &self.record {
            Record::Antibody(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_mutation(&self) -> Option<&MutationRecord> {
        match &self.record {
            Record::Mutation(record) => Some(record),
            _ => None,
        }
    }

    /// Identifier of the underlying record, whatever its kind.
    pub fn record_id(&self) -> &str {
        match &self.record {
            Record::Mutation(record) => &record.id,
            Record::Antibody(record) => &record.id,
            Record::Literature(record) => &record.id,
        }
    }
}

/// Similarity search over a fixed record collection.
///
/// Implementations return at most `limit` hits ranked by descending
/// similarity. Failures are reported as errors; the pipeline stages degrade
/// them to empty result sets rather than aborting a run.
pub trait SemanticIndex {
    fn search(
        &self,
        collection: Collection,
        query: &str,
        filter: Option<&FieldFilter>,
        limit: usize,
    ) -> Result<Vec<Hit>, RetrievalError>;
}
