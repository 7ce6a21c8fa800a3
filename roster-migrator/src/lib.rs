//! Roster Migrator Library
//!
//! This library provides the runtime around the migration engine: settings
//! read from the environment, wiring of the PostgreSQL collaborators, demo
//! seeding of the source store and the application error type.

pub mod config;
pub mod errors;
pub mod seed;

pub use config::{Dependencies, LogFormat, Settings};
pub use errors::MigratorError;
