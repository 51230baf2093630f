//! Error types for the core library.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The ring was configured with zero virtual nodes per physical node.
    #[error("invalid virtual node count {0}: every node needs at least one position")]
    InvalidVirtualNodeCount(usize),

    /// A lookup was made against a ring with no positions.
    #[error("ring is empty: no node owns the key")]
    EmptyRing,

    /// Configuration values were rejected.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Error {
    /// True for the recoverable empty-ring outcome of a lookup.
    pub fn is_empty_ring(&self) -> bool {
        matches!(self, Error::EmptyRing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InvalidVirtualNodeCount(0).to_string(),
            "invalid virtual node count 0: every node needs at least one position"
        );
        assert_eq!(Error::EmptyRing.to_string(), "ring is empty: no node owns the key");
        assert!(Error::EmptyRing.is_empty_ring());
        assert!(!Error::Config("x".into()).is_empty_ring());
    }
}
