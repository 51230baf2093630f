//! Hash ring data structure.
//!
//! Positions live in a `BTreeMap<Token, NodeId>` behind a reader-writer
//! lock: membership changes take the write lock, lookups share the read
//! lock. Every operation is synchronous and in-memory; the cost is
//! dominated by O(log n) map operations over n = nodes x vnodes.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use metrics::{counter, gauge};
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::config::RingConfig;
use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::partitioner::Partitioner;
use crate::ring::snapshot::RingSnapshot;
use crate::token::Token;
use crate::vnode::{VirtualNode, DEFAULT_SEPARATOR};

/// Ordered map from ring position to owning node.
pub type Positions = BTreeMap<Token, NodeId>;

/// Externally visible state of a ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RingState {
    /// No positions: every lookup reports [`Error::EmptyRing`].
    Empty,
    /// At least one position: every lookup resolves to a node.
    NonEmpty,
}

/// Consistent hash ring with virtual nodes.
///
/// The virtual node count, separator and partitioner are fixed at
/// construction. Removal recomputes a node's positions from those three
/// values, so they must not differ between adding and removing a node.
///
/// # Position collisions
///
/// If a virtual node hashes to a token that is already occupied, the new
/// entry replaces the old one. No error is raised; [`HashRing::add_node`]
/// reports the number of replaced entries and a `warn!` event is emitted.
/// The displaced node silently owns one position fewer, which
/// [`HashRing::effective_virtual_nodes`] makes observable.
///
/// # Repeated adds
///
/// Adding the same node twice writes the same tokens again, which replaces
/// the node's own entries. Call [`HashRing::add_node`] once per node.
#[derive(Debug)]
pub struct HashRing {
    positions: RwLock<Positions>,
    partitioner: Arc<dyn Partitioner>,
    virtual_nodes: usize,
    separator: String,
}

impl HashRing {
    /// Create an empty ring placing `virtual_nodes` positions per node.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidVirtualNodeCount`] when `virtual_nodes` is zero.
    pub fn new(partitioner: Arc<dyn Partitioner>, virtual_nodes: usize) -> Result<Self> {
        Self::with_separator(partitioner, virtual_nodes, DEFAULT_SEPARATOR)
    }

    /// Create an empty ring with a custom vnode label separator.
    pub fn with_separator(
        partitioner: Arc<dyn Partitioner>,
        virtual_nodes: usize,
        separator: impl Into<String>,
    ) -> Result<Self> {
        if virtual_nodes == 0 {
            return Err(Error::InvalidVirtualNodeCount(virtual_nodes));
        }
        Ok(Self {
            positions: RwLock::new(BTreeMap::new()),
            partitioner,
            virtual_nodes,
            separator: separator.into(),
        })
    }

    /// Create a ring and add each of `nodes` in order.
    pub fn with_nodes<I, S>(
        nodes: I,
        virtual_nodes: usize,
        partitioner: Arc<dyn Partitioner>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ring = Self::new(partitioner, virtual_nodes)?;
        for node in nodes {
            ring.add_node(node.as_ref());
        }
        Ok(ring)
    }

    /// Create an empty ring from validated configuration.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        config.validate()?;
        Self::with_separator(
            config.partitioner.build(),
            config.virtual_nodes,
            config.separator.clone(),
        )
    }

    /// Place `node` at its `virtual_nodes` positions.
    ///
    /// Returns how many already-occupied positions were overwritten.
    pub fn add_node(&self, node: &str) -> usize {
        let vnodes = self.placements(node);
        let mut overwritten = 0usize;

        let total = {
            let mut positions = self.positions.write();
            for vnode in vnodes {
                let VirtualNode {
                    token,
                    node_id,
                    index,
                } = vnode;
                if let Some(previous) = positions.insert(token, node_id) {
                    overwritten += 1;
                    warn!(
                        node,
                        index,
                        %token,
                        displaced = %previous,
                        "virtual node overwrote an occupied ring position"
                    );
                }
            }
            positions.len()
        };

        counter!("ring_nodes_added_total").increment(1);
        if overwritten > 0 {
            counter!("ring_positions_overwritten_total").increment(overwritten as u64);
        }
        gauge!("ring_positions").set(total as f64);
        debug!(node, vnodes = self.virtual_nodes, overwritten, positions = total, "added node to ring");

        overwritten
    }

    /// Delete the positions computed for `node`.
    ///
    /// Each computed position is removed if present, whichever node
    /// currently holds it. Returns the number of positions removed.
    pub fn remove_node(&self, node: &str) -> usize {
        let vnodes = self.placements(node);

        let (removed, total) = {
            let mut positions = self.positions.write();
            let removed = vnodes
                .iter()
                .filter(|vnode| positions.remove(&vnode.token).is_some())
                .count();
            (removed, positions.len())
        };

        counter!("ring_nodes_removed_total").increment(1);
        gauge!("ring_positions").set(total as f64);
        debug!(node, removed, positions = total, "removed node from ring");

        removed
    }

    /// Find the node owning `key`: the first position clockwise from the
    /// key's token, wrapping to the smallest position.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] when the ring has no positions.
    pub fn locate(&self, key: impl AsRef<[u8]>) -> Result<NodeId> {
        self.locate_token(key)
            .map(|(_, node)| node)
            .ok_or(Error::EmptyRing)
    }

    /// Like [`HashRing::locate`], with the empty ring reported as `None`.
    pub fn lookup(&self, key: impl AsRef<[u8]>) -> Option<NodeId> {
        self.locate_token(key).map(|(_, node)| node)
    }

    /// The owning position and node for `key`.
    pub fn locate_token(&self, key: impl AsRef<[u8]>) -> Option<(Token, NodeId)> {
        let token = self.partitioner.partition(key.as_ref());
        let positions = self.positions.read();
        let (position, node) = successor(&positions, token)?;
        trace!(%token, %position, %node, "located key");
        Some((position, node.clone()))
    }

    /// [`RingState::Empty`] until the first position is placed.
    pub fn state(&self) -> RingState {
        if self.is_empty() {
            RingState::Empty
        } else {
            RingState::NonEmpty
        }
    }

    /// True when no position is placed.
    pub fn is_empty(&self) -> bool {
        self.positions.read().is_empty()
    }

    /// Total number of positions (vnodes) on the ring.
    pub fn position_count(&self) -> usize {
        self.positions.read().len()
    }

    /// Number of distinct physical nodes holding at least one position.
    pub fn node_count(&self) -> usize {
        self.distinct_nodes().len()
    }

    /// Physical nodes holding at least one position, sorted.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.distinct_nodes().into_iter().collect()
    }

    /// Whether `node` holds at least one position.
    pub fn contains_node(&self, node: &str) -> bool {
        self.positions.read().values().any(|owner| owner == node)
    }

    /// All positions in ascending token order.
    pub fn positions(&self) -> Vec<(Token, NodeId)> {
        self.positions
            .read()
            .iter()
            .map(|(token, node)| (*token, node.clone()))
            .collect()
    }

    /// How many of `node`'s computed positions are currently held by it.
    ///
    /// Equals [`HashRing::virtual_node_count`] for a present node unless
    /// collisions, with other nodes or among its own vnodes, displaced some
    /// of its positions.
    pub fn effective_virtual_nodes(&self, node: &str) -> usize {
        let tokens: BTreeSet<Token> = self
            .placements(node)
            .into_iter()
            .map(|vnode| vnode.token)
            .collect();
        let positions = self.positions.read();
        tokens
            .iter()
            .filter(|token| positions.get(token).is_some_and(|owner| owner == node))
            .count()
    }

    /// The computed virtual nodes for `node`, whether or not it is present.
    pub fn placements(&self, node: &str) -> Vec<VirtualNode> {
        (0..self.virtual_nodes)
            .map(|index| VirtualNode::place(self.partitioner.as_ref(), node, &self.separator, index))
            .collect()
    }

    /// Configured virtual nodes per physical node.
    pub fn virtual_node_count(&self) -> usize {
        self.virtual_nodes
    }

    /// Separator between node name and vnode index in placement labels.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The hash strategy used for placement and lookup.
    pub fn partitioner(&self) -> &Arc<dyn Partitioner> {
        &self.partitioner
    }

    /// Name reported by the partitioner.
    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Copy the current positions into an immutable view.
    pub fn snapshot(&self) -> RingSnapshot {
        let positions = self.positions.read().clone();
        RingSnapshot::new(positions, Arc::clone(&self.partitioner))
    }

    fn distinct_nodes(&self) -> BTreeSet<NodeId> {
        self.positions.read().values().cloned().collect()
    }
}

/// First position at or after `token`, wrapping to the smallest position.
pub(crate) fn successor(positions: &Positions, token: Token) -> Option<(Token, &NodeId)> {
    positions
        .range(token..)
        .next()
        .or_else(|| positions.iter().next())
        .map(|(position, node)| (*position, node))
}
