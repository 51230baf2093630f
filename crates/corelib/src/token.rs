//! Token type for ring positions.
//!
//! A token is the output of a partitioner: an unsigned position in the
//! partitioner's hash space. Tokens are cheap to copy, compare and hash.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position on the hash ring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(pub u64);

impl Token {
    /// Start of every hash space.
    pub const ZERO: Token = Token(0);

    pub fn value(self) -> u64 {
        self.0
    }

    /// Clockwise distance from `self` to `other` in a hash space whose
    /// largest value is `space_max`.
    ///
    /// Walking clockwise from the maximum wraps to zero, so the distance from
    /// a token to a smaller one covers the tail of the space plus the head.
    pub fn distance_to(self, other: Token, space_max: Token) -> u128 {
        if other.0 >= self.0 {
            u128::from(other.0 - self.0)
        } else {
            u128::from(space_max.0 - self.0) + u128::from(other.0) + 1
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Token {
    fn from(value: u64) -> Self {
        Token(value)
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(u64::from(value))
    }
}
