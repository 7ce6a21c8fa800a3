mod config;
mod extraction;
mod lookup;
mod orchestrator;
mod write;

pub use config::ConfigError;
pub use extraction::ExtractionError;
pub use lookup::LookupError;
pub use orchestrator::{MigrationError, OrchestratorError};
pub use write::WriteError;
