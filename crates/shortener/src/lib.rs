//! URL shortener sharded over a consistent hash ring.
//!
//! Each shortened URL gets the next value of an auto-increment counter,
//! rendered in Base62 as its short code. The code is then routed through
//! the ring, and the owning node's table stores the mapping. The ring is
//! used purely as a routing primitive: `add_node`, `remove_node`, `locate`.

pub mod base62;
pub mod error;
pub mod shortener;

pub use error::{Result, ShortenerError};
pub use shortener::{ShortLink, Shortener, DEFAULT_BASE_URL};
