//! Builder for [`HashRing`].

use std::sync::Arc;

use crate::config::{RingConfig, DEFAULT_VIRTUAL_NODES};
use crate::error::Result;
use crate::partitioner::{Murmur3Partitioner, Partitioner};
use crate::ring::ring::HashRing;
use crate::vnode::DEFAULT_SEPARATOR;

/// Collects ring settings and initial members, then builds the ring.
///
/// ```rust
/// use corelib::ring::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_vnodes(5)
///     .add_node("NodeA")
///     .add_node("NodeB")
///     .build()
///     .unwrap();
/// assert_eq!(ring.position_count(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder {
    virtual_nodes: usize,
    partitioner: Arc<dyn Partitioner>,
    separator: String,
    nodes: Vec<String>,
}

impl RingBuilder {
    /// Defaults: 256 vnodes per node, Murmur3, `"-VN"` separator.
    pub fn new() -> Self {
        Self {
            virtual_nodes: DEFAULT_VIRTUAL_NODES,
            partitioner: Arc::new(Murmur3Partitioner::new()),
            separator: DEFAULT_SEPARATOR.to_owned(),
            nodes: Vec::new(),
        }
    }

    /// Start from configuration values.
    pub fn from_config(config: &RingConfig) -> Self {
        Self {
            virtual_nodes: config.virtual_nodes,
            partitioner: config.partitioner.build(),
            separator: config.separator.clone(),
            nodes: Vec::new(),
        }
    }

    pub fn with_vnodes(mut self, virtual_nodes: usize) -> Self {
        self.virtual_nodes = virtual_nodes;
        self
    }

    pub fn with_partitioner(mut self, partitioner: impl Partitioner) -> Self {
        self.partitioner = Arc::new(partitioner);
        self
    }

    pub fn with_shared_partitioner(mut self, partitioner: Arc<dyn Partitioner>) -> Self {
        self.partitioner = partitioner;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn add_node(mut self, node: impl Into<String>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn add_nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Build the ring, adding nodes in the order they were given.
    ///
    /// # Errors
    ///
    /// Fails when the virtual node count is zero.
    pub fn build(self) -> Result<HashRing> {
        let ring = HashRing::with_separator(self.partitioner, self.virtual_nodes, self.separator)?;
        for node in &self.nodes {
            ring.add_node(node);
        }
        Ok(ring)
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
