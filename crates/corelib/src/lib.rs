//! Core library for consistent hashing implementation.
//!
//! This crate provides the fundamental abstractions for consistent hashing:
//! - Token positions and virtual nodes
//! - Partitioner algorithms (the ring's pluggable hash function)
//! - The hash ring with ordered successor lookup and wraparound
//! - Ring configuration
//! - Ownership analysis over ring snapshots
//!
//! ```rust
//! use corelib::ring::RingBuilder;
//!
//! let ring = RingBuilder::new()
//!     .with_vnodes(5)
//!     .add_nodes(["NodeA", "NodeB", "NodeC"])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(ring.locate("Key1").unwrap(), "NodeC");
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod topology;
pub mod vnode;

pub use config::RingConfig;
pub use error::{Error, Result};
pub use node::NodeId;
pub use partitioner::{Partitioner, PartitionerKind};
pub use ring::{HashRing, Remap, Ring, RingBuilder, RingSnapshot, RingState};
pub use token::Token;
pub use topology::{TokenRange, Topology};
pub use vnode::VirtualNode;
