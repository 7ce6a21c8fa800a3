use roster_migrator_repository::RestartPolicy;

use crate::errors::ConfigError;

/// Records per write transaction unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Tuning of a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Source records per write transaction.
    pub chunk_size: usize,
    /// Source records per extractor page.
    pub page_size: u64,
    pub restart_policy: RestartPolicy,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            page_size: DEFAULT_CHUNK_SIZE as u64,
            restart_policy: RestartPolicy::default(),
        }
    }
}

impl MigrationConfig {
    /// Builds a validated configuration. The page size defaults to the chunk
    /// size.
    pub fn new(
        chunk_size: usize,
        page_size: Option<u64>,
        restart_policy: RestartPolicy,
    ) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        let page_size = page_size.unwrap_or(chunk_size as u64);
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(Self {
            chunk_size,
            page_size,
            restart_policy,
        })
    }
}

/// Parses `allow-after-failure` or `never`, ignoring case.
pub fn parse_restart_policy(value: &str) -> Result<RestartPolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "allow-after-failure" => Ok(RestartPolicy::AllowAfterFailure),
        "never" => Ok(RestartPolicy::Never),
        _ => Err(ConfigError::UnknownRestartPolicy(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_defaults_to_chunk_size() {
        let config = MigrationConfig::new(25, None, RestartPolicy::Never).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(MigrationConfig::default().chunk_size, 100);
    }

    #[test]
    fn test_zero_sizes_are_rejected() {
        assert_eq!(
            MigrationConfig::new(0, None, RestartPolicy::default()),
            Err(ConfigError::ZeroChunkSize)
        );
        assert_eq!(
            MigrationConfig::new(10, Some(0), RestartPolicy::default()),
            Err(ConfigError::ZeroPageSize)
        );
    }

    #[test]
    fn test_restart_policy_parsing() {
        assert_eq!(parse_restart_policy("never"), Ok(RestartPolicy::Never));
        assert_eq!(
            parse_restart_policy("Allow-After-Failure"),
            Ok(RestartPolicy::AllowAfterFailure)
        );
        assert!(parse_restart_policy("sometimes").is_err());
    }
}
