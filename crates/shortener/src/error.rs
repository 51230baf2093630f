//! Error types for the shortener.

/// Result type alias for shortener operations.
pub type Result<T> = std::result::Result<T, ShortenerError>;

#[derive(Debug, thiserror::Error)]
pub enum ShortenerError {
    /// The short code is not valid Base62 or overflows a 64-bit id.
    #[error("invalid short code '{0}'")]
    InvalidCode(String),

    /// No URL is stored under the short code.
    #[error("no url stored for '{0}'")]
    NotFound(String),

    /// The shard ring could not route the code.
    #[error(transparent)]
    Ring(#[from] corelib::Error),
}
