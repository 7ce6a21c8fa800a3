use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An error flattened together with every nested cause, outermost first.
///
/// Carried by failed run results so the full diagnostic survives after the
/// original error values are dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorChain {
    pub messages: Vec<String>,
}

impl ErrorChain {
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(cause) = current {
            messages.push(cause.to_string());
            current = cause.source();
        }
        Self { messages }
    }

    /// The outermost message.
    pub fn summary(&self) -> &str {
        self.messages.first().map(String::as_str).unwrap_or_default()
    }

    /// The innermost cause.
    pub fn root_cause(&self) -> &str {
        self.messages.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for ErrorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages.join(": caused by: "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("connection reset")]
    struct Io;

    #[derive(Debug, Error)]
    #[error("commit failed")]
    struct Commit(#[source] Io);

    #[derive(Debug, Error)]
    #[error("chunk 3 rejected")]
    struct Chunk(#[source] Commit);

    #[test]
    fn test_chain_walks_every_source() {
        let chain = ErrorChain::from_error(&Chunk(Commit(Io)));

        assert_eq!(chain.messages, vec!["chunk 3 rejected", "commit failed", "connection reset"]);
        assert_eq!(chain.summary(), "chunk 3 rejected");
        assert_eq!(chain.root_cause(), "connection reset");
        assert_eq!(
            chain.to_string(),
            "chunk 3 rejected: caused by: commit failed: caused by: connection reset"
        );
    }
}
