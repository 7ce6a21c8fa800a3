//! Configuration module for the Roster Migrator.
//! Reads settings from the environment and wires the collaborators.
mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{LogFormat, Settings};
