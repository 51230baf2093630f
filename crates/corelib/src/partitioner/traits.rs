//! Core partitioner trait definitions.

use std::fmt::Debug;

use crate::token::Token;

/// A partitioner converts keys into tokens for placement on the hash ring.
///
/// This is the ring's hash function. Partitioners are stateless apart from
/// fixed construction parameters (seeds, fold modes), so the same bytes map
/// to the same token in every call and every process. The ring holds one
/// behind an `Arc<dyn Partitioner>`, which makes the algorithm a
/// construction-time choice rather than a compiled-in constant.
pub trait Partitioner: Send + Sync + Debug + 'static {
    /// Converts a key into a token.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to partition
    ///
    /// # Returns
    ///
    /// A token representing the position on the ring
    fn partition(&self, key: &[u8]) -> Token;

    /// Returns the minimum token value for this partitioner.
    fn min_token(&self) -> Token {
        Token::ZERO
    }

    /// Returns the maximum token value this partitioner can produce.
    fn max_token(&self) -> Token;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
