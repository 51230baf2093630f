//! Fast 64-bit partitioners with fixed seeds.

use std::hash::Hasher;

use siphasher::sip::SipHasher13;
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::partitioner::traits::Partitioner;
use crate::token::Token;

/// BLAKE3 partitioner: the first eight bytes of the hash, little-endian.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Partitioner;

impl Partitioner for Blake3Partitioner {
    fn partition(&self, key: &[u8]) -> Token {
        let hash = ::blake3::hash(key);
        let mut word = [0u8; 8];
        word.copy_from_slice(&hash.as_bytes()[..8]);
        Token(u64::from_le_bytes(word))
    }

    fn max_token(&self) -> Token {
        Token(u64::MAX)
    }

    fn name(&self) -> &'static str {
        "Blake3Partitioner"
    }
}

/// xxh3 partitioner.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Partitioner {
    seed: u64,
}

impl Xxh3Partitioner {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl Partitioner for Xxh3Partitioner {
    fn partition(&self, key: &[u8]) -> Token {
        Token(xxh3_64_with_seed(key, self.seed))
    }

    fn max_token(&self) -> Token {
        Token(u64::MAX)
    }

    fn name(&self) -> &'static str {
        "Xxh3Partitioner"
    }
}

/// SipHash-1-3 partitioner.
///
/// The keys are fixed at construction, unlike `std`'s randomly keyed
/// hasher, so placements survive restarts.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipPartitioner {
    key0: u64,
    key1: u64,
}

impl SipPartitioner {
    pub fn with_keys(key0: u64, key1: u64) -> Self {
        Self { key0, key1 }
    }
}

impl Partitioner for SipPartitioner {
    fn partition(&self, key: &[u8]) -> Token {
        let mut hasher = SipHasher13::new_with_keys(self.key0, self.key1);
        hasher.write(key);
        Token(hasher.finish())
    }

    fn max_token(&self) -> Token {
        Token(u64::MAX)
    }

    fn name(&self) -> &'static str {
        "SipPartitioner"
    }
}
