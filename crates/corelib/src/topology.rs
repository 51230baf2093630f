//! Ring topology abstractions.
//!
//! Breaks a ring snapshot into the token ranges each position owns and
//! summarizes how much of the hash space every physical node receives.
//!
//! Position `p_i` owns `(p_{i-1}, p_i]`. The smallest position also owns
//! everything above the largest position, since lookups wrap around.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::node::NodeId;
use crate::ring::RingSnapshot;
use crate::token::Token;

/// A contiguous arc of the hash space owned by one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRange {
    /// Exclusive lower bound (the preceding position).
    pub start: Token,
    /// Inclusive upper bound (the owning position).
    pub end: Token,
    pub node: NodeId,
    /// Number of tokens in the arc.
    pub width: u128,
}

/// Ownership view over a ring snapshot.
#[derive(Debug, Clone)]
pub struct Topology {
    ranges: Vec<TokenRange>,
    space: u128,
}

impl Topology {
    pub fn from_snapshot(snapshot: &RingSnapshot) -> Self {
        let space_max = snapshot.space_max();
        let space = u128::from(space_max.0) + 1;
        let positions = snapshot.positions();

        let ranges = match positions.iter().next_back() {
            None => Vec::new(),
            Some((&last, _)) => {
                let mut previous = last;
                positions
                    .iter()
                    .map(|(&end, node)| {
                        let width = if positions.len() == 1 {
                            space
                        } else {
                            previous.distance_to(end, space_max)
                        };
                        let range = TokenRange {
                            start: previous,
                            end,
                            node: node.clone(),
                            width,
                        };
                        previous = end;
                        range
                    })
                    .collect()
            }
        };

        Self { ranges, space }
    }

    pub fn ranges(&self) -> &[TokenRange] {
        &self.ranges
    }

    /// Size of the hash space.
    pub fn space(&self) -> u128 {
        self.space
    }

    /// Fraction of the hash space owned by each node.
    pub fn ownership(&self) -> BTreeMap<NodeId, f64> {
        let mut widths: BTreeMap<NodeId, u128> = BTreeMap::new();
        for range in &self.ranges {
            *widths.entry(range.node.clone()).or_default() += range.width;
        }
        widths
            .into_iter()
            .map(|(node, width)| (node, width as f64 / self.space as f64))
            .collect()
    }

    /// Ratio of the largest to the smallest ownership share.
    ///
    /// `None` for an empty ring. 1.0 is a perfectly even split.
    pub fn spread(&self) -> Option<f64> {
        let shares = self.ownership();
        let max = shares.values().copied().fold(f64::NAN, f64::max);
        let min = shares.values().copied().fold(f64::NAN, f64::min);
        if shares.is_empty() || min <= 0.0 {
            return None;
        }
        Some(max / min)
    }
}
