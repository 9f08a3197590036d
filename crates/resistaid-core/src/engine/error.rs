use super::config::ConfigError;
use thiserror::Error;

/// Caller-facing pipeline errors.
///
/// Degraded collaborator behavior (empty retrieval results, retrieval
/// failures, unknown mutation identifiers) is never an error: those cases
/// have documented fallback scores. Only invalid caller input and invalid
/// configuration surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("mutation identifier must not be empty")]
    EmptyMutationId,

    #[error("candidate count must be positive")]
    InvalidCandidateCount,

    #[error("configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
