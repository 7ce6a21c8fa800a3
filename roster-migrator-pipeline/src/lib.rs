//! # Roster Migrator Pipeline
//! This crate implements the two-phase reconciliation engine: a paginated
//! extractor over the source store, per-kind reconcilers that diff source
//! records against the target store, a chunked transactional writer, the
//! orchestrator that owns run identity and phase ordering, and the completion
//! notifier that invalidates read caches after a successful run.
pub mod extractor;
pub mod notifier;
pub mod orchestrator;
pub mod processor;
pub mod writer;

pub mod errors;
