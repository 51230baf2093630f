//! Consistent hash ring implementation.
//!
//! The ring manages token positions and provides efficient lookup
//! operations for finding nodes responsible for keys.

pub mod builder;
pub mod ring;
pub mod snapshot;

pub use builder::RingBuilder;
pub use ring::{HashRing, Positions, RingState};
pub use snapshot::{Remap, RingSnapshot};

/// Alias for the main ring type (used by lib.rs).
pub type Ring = HashRing;
