//! # Roster Migrator Shared
//! This crate defines the data structures shared across the roster migrator
//! ecosystem: the unit and member entities in their raw source and canonical
//! shapes, reconciliation actions, per-phase counters, run identity and the
//! result reported for every migration run.
pub mod types;
