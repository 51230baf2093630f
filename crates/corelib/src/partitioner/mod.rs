//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting keys into tokens
//! that can be placed on the hash ring.
//!
//! Two families are provided:
//!
//! - **Digest-derived**: a message digest folded into an integer by a
//!   documented [`DigestFold`].
//! - **Non-cryptographic**: MurmurHash3 (the ring's default, with a
//!   compatibility variant), plus BLAKE3,
//!   xxh3 and SipHash variants with fixed seeds.

pub mod fast;
pub mod kind;
pub mod message_digest;
pub mod murmur3;
pub mod traits;

pub use fast::{Blake3Partitioner, SipPartitioner, Xxh3Partitioner};
pub use kind::PartitionerKind;
pub use message_digest::{DigestFold, DigestPartitioner, Md5Partitioner};
pub use murmur3::{Murmur3Partitioner, Murmur3Variant};
pub use traits::Partitioner;
