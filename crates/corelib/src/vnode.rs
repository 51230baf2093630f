//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Virtual nodes are a technique to improve load distribution in consistent hashing.
//! Instead of each physical node having a single token on the ring, each node has
//! multiple tokens (virtual nodes). This provides:
//!
//! 1. **Better Load Distribution**: More tokens = smoother distribution of keys
//! 2. **Gradual Rebalancing**: When nodes join/leave, only a fraction of keys move
//! 3. **Fault Tolerance**: Failure of one node affects fewer keys (distributed across vnodes)
//!
//! # Placement
//!
//! Virtual node `i` of node `n` sits at `partition(n + separator + i)`. The
//! position is recomputed, never stored per node, so the same node name,
//! separator and index always land on the same token.
//!
//! # Performance Characteristics
//!
//! - **Lookup**: O(log n) where n = total vnodes
//! - **Rebalancing**: roughly k/N keys move when a node joins/leaves
//!   (k = total keys, N = physical nodes)

use std::fmt;

use crate::node::NodeId;
use crate::partitioner::Partitioner;
use crate::token::Token;

/// Separator placed between the node name and the vnode index.
pub const DEFAULT_SEPARATOR: &str = "-VN";

/// A virtual node on the hash ring.
///
/// Represents a single token position owned by a physical node.
///
/// Two virtual nodes may compute the same token. The ring keeps only the
/// later insertion in that case, so a node can own fewer positions than
/// its configured count.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Token position on the ring.
    pub token: Token,

    /// The physical node that owns this virtual node.
    pub node_id: NodeId,

    /// Index of this vnode among its node's vnodes.
    pub index: usize,
}

impl VirtualNode {
    /// Create a new virtual node.
    #[inline]
    pub fn new(token: Token, node_id: NodeId, index: usize) -> Self {
        Self {
            token,
            node_id,
            index,
        }
    }

    /// The string hashed to place vnode `index` of `node`.
    pub fn label(node: &str, separator: &str, index: usize) -> String {
        format!("{node}{separator}{index}")
    }

    /// Compute the placement of vnode `index` of `node`.
    ///
    /// # Example
    /// ```rust
    /// use corelib::partitioner::Murmur3Partitioner;
    /// use corelib::VirtualNode;
    ///
    /// let vnode = VirtualNode::place(&Murmur3Partitioner::new(), "NodeA", "-VN", 0);
    /// assert_eq!(vnode.token.0, 1_421_068_445);
    /// ```
    pub fn place(partitioner: &dyn Partitioner, node: &str, separator: &str, index: usize) -> Self {
        let label = Self::label(node, separator, index);
        let token = partitioner.partition(label.as_bytes());
        Self::new(token, NodeId::from(node), index)
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.token
    }

    #[inline]
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Calculate the clockwise distance to another virtual node in a hash
    /// space ending at `space_max`.
    #[inline]
    pub fn distance_to(&self, other: &Self, space_max: Token) -> u128 {
        self.token.distance_to(other.token, space_max)
    }
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VNode(token={}, node={}, index={})",
            self.token, self.node_id, self.index
        )
    }
}
