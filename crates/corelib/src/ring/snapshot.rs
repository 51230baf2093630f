//! Immutable ring views.
//!
//! A snapshot freezes the positions at one instant so a batch of lookups
//! sees a single topology, and so two topologies can be compared key by key.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::partitioner::Partitioner;
use crate::ring::ring::{successor, Positions};
use crate::token::Token;

/// A key whose owner differs between two ring states.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Remap {
    pub key: String,
    /// Owner before the change; `None` if the ring was empty.
    pub from: Option<NodeId>,
    /// Owner after the change; `None` if the ring became empty.
    pub to: Option<NodeId>,
}

/// Point-in-time copy of a ring's positions.
#[derive(Clone, Debug)]
pub struct RingSnapshot {
    positions: Arc<Positions>,
    partitioner: Arc<dyn Partitioner>,
}

impl RingSnapshot {
    pub(crate) fn new(positions: Positions, partitioner: Arc<dyn Partitioner>) -> Self {
        Self {
            positions: Arc::new(positions),
            partitioner,
        }
    }

    pub fn locate(&self, key: impl AsRef<[u8]>) -> Result<&NodeId> {
        self.lookup(key).ok_or(Error::EmptyRing)
    }

    pub fn lookup(&self, key: impl AsRef<[u8]>) -> Option<&NodeId> {
        let token = self.partitioner.partition(key.as_ref());
        self.successor(token).map(|(_, node)| node)
    }

    /// First position at or after `token`, wrapping past the maximum.
    pub fn successor(&self, token: Token) -> Option<(Token, &NodeId)> {
        successor(&self.positions, token)
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Largest token the ring's partitioner can produce.
    pub fn space_max(&self) -> Token {
        self.partitioner.max_token()
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Keys from `keys` whose owner in `after` differs from their owner here.
    pub fn owner_changes<I, K>(&self, after: &RingSnapshot, keys: I) -> Vec<Remap>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .filter_map(|key| {
                let key = key.as_ref();
                let from = self.lookup(key);
                let to = after.lookup(key);
                (from != to).then(|| Remap {
                    key: key.to_owned(),
                    from: from.cloned(),
                    to: to.cloned(),
                })
            })
            .collect()
    }
}
