//! # ResistAID Core Library
//!
//! A library for retrieval-augmented design and triage of antibody
//! variable-domain candidates against receptor resistance mutations.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear separation of
//! concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless amino-acid chemistry (residue classes,
//!   sequence property analysis), the immutable domain models (`MutationRecord`, `Candidate`),
//!   and the retrieval-collaborator abstraction (`SemanticIndex`).
//!
//! - **[`engine`]: The Logic Core.** This layer hosts the pipeline stages: the stochastic
//!   `SequenceSynthesizer`, the deterministic `FeasibilityEvaluator`, and the retrieval-backed
//!   `EvidenceLinker` and `SimilarityScout`, plus their shared configuration, error, and
//!   progress-reporting machinery.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing layer. It ties the
//!   `engine` and `core` together to execute one complete design run: scout the evidence base,
//!   synthesize candidates, assess each one, and fold everything into a ranked [`workflows::design::Report`].

pub mod core;
pub mod engine;
pub mod workflows;
