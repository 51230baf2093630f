//! Murmur3 partitioner implementation.
//!
//! MurmurHash3 x86 32-bit: the key is consumed as little-endian 4-byte
//! words, the trailing 1-3 bytes are mixed in as a partial word, and the
//! total length is folded in before the avalanche finalizer
//! (multiply-xor-shift). Tokens are masked to the non-negative 31-bit range.
//!
//! [`Murmur3Variant::Compat`] reproduces placements of rings built with a
//! widespread truncated port of the same function.

use serde::{Deserialize, Serialize};

use crate::partitioner::traits::Partitioner;
use crate::token::Token;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// Largest token a [`Murmur3Partitioner`] produces.
pub const MURMUR3_MAX_TOKEN: u64 = 0x7fff_ffff;

/// Which rendition of the Murmur3 block loop a partitioner runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Murmur3Variant {
    /// Reference MurmurHash3 x86_32.
    #[default]
    Reference,
    /// Big-endian words, trailing 1-3 bytes dropped, and only the tail
    /// length (not the total length) folded in.
    ///
    /// Keys that differ only in their trailing partial word hash alike:
    /// `Key10` through `Key19` all share one token.
    Compat,
}

/// Murmur3 partitioner, the ring's default hash strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Murmur3Partitioner {
    seed: u32,
    variant: Murmur3Variant,
}

impl Murmur3Partitioner {
    /// Seed used unless one is given explicitly.
    pub const DEFAULT_SEED: u32 = 0x9747_b28c;

    pub fn new() -> Self {
        Self::with_seed(Self::DEFAULT_SEED)
    }

    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            variant: Murmur3Variant::Reference,
        }
    }

    /// The [`Murmur3Variant::Compat`] hash with the default seed.
    pub fn compat() -> Self {
        Self::new().with_variant(Murmur3Variant::Compat)
    }

    pub fn with_variant(mut self, variant: Murmur3Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn variant(&self) -> Murmur3Variant {
        self.variant
    }
}

impl Default for Murmur3Partitioner {
    fn default() -> Self {
        Self::new()
    }
}

impl Partitioner for Murmur3Partitioner {
    fn partition(&self, key: &[u8]) -> Token {
        let h = match self.variant {
            Murmur3Variant::Reference => murmur3_32(key, self.seed),
            Murmur3Variant::Compat => murmur3_32_compat(key, self.seed),
        };
        Token(u64::from(h & 0x7fff_ffff))
    }

    fn max_token(&self) -> Token {
        Token(MURMUR3_MAX_TOKEN)
    }

    fn name(&self) -> &'static str {
        match self.variant {
            Murmur3Variant::Reference => "Murmur3Partitioner",
            Murmur3Variant::Compat => "Murmur3CompatPartitioner",
        }
    }
}

#[inline]
fn mix_k(mut k: u32) -> u32 {
    k = k.wrapping_mul(C1);
    k = k.rotate_left(15);
    k.wrapping_mul(C2)
}

/// Final avalanche: forces every input bit to affect every output bit.
#[inline]
pub fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Full 32-bit MurmurHash3 (x86 variant) of `data`.
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut h = seed;
    let mut blocks = data.chunks_exact(4);

    for block in &mut blocks {
        let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h ^= mix_k(k);
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (i, byte) in tail.iter().enumerate() {
            k ^= u32::from(*byte) << (8 * i);
        }
        h ^= mix_k(k);
    }

    // Length is folded in modulo 2^32, as in the reference implementation.
    h ^= data.len() as u32;
    fmix32(h)
}

/// The [`Murmur3Variant::Compat`] rendition of [`murmur3_32`].
pub fn murmur3_32_compat(data: &[u8], seed: u32) -> u32 {
    let mut h = seed;
    let mut blocks = data.chunks_exact(4);

    for block in &mut blocks {
        let k = u32::from_be_bytes([block[0], block[1], block[2], block[3]]);
        h ^= mix_k(k);
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    // The tail bytes themselves never reach the hash.
    h ^= blocks.remainder().len() as u32;
    fmix32(h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vectors() {
        assert_eq!(murmur3_32(b"", 0), 0);
        assert_eq!(murmur3_32(b"", 1), 0x514e_28b7);
        assert_eq!(murmur3_32(b"hello", 0), 0x248b_fa47);
        assert_eq!(murmur3_32(b"Hello, world!", 0x9747_b28c), 0x2488_4cba);
        assert_eq!(
            murmur3_32(b"The quick brown fox jumps over the lazy dog", 0x9747_b28c),
            0x2fa8_26cd
        );
    }

    #[test]
    fn test_partition_masks_to_31_bits() {
        let partitioner = Murmur3Partitioner::new();
        assert_eq!(partitioner.partition(b"NodeA-VN0"), Token(1_421_068_445));
        assert_eq!(partitioner.partition(b"Key1"), Token(473_250_725));
        assert_eq!(partitioner.partition(b"Key10"), Token(284_853_994));
        for i in 0..1000 {
            let token = partitioner.partition(format!("key-{i}").as_bytes());
            assert!(token.0 <= MURMUR3_MAX_TOKEN);
        }
    }

    #[test]
    fn test_tail_bytes_affect_hash() {
        let partitioner = Murmur3Partitioner::new();
        assert_ne!(partitioner.partition(b"Key10"), partitioner.partition(b"Key11"));
        assert_ne!(partitioner.partition(b"abcd"), partitioner.partition(b"abcde"));
    }

    #[test]
    fn test_seed_changes_placement() {
        let a = Murmur3Partitioner::with_seed(1);
        let b = Murmur3Partitioner::with_seed(2);
        assert_ne!(a.partition(b"key"), b.partition(b"key"));
        assert_eq!(Murmur3Partitioner::default().seed(), 0x9747_b28c);
    }

    #[test]
    fn test_compat_recorded_tokens() {
        let partitioner = Murmur3Partitioner::compat();
        assert_eq!(partitioner.partition(b"NodeAVN0"), Token(1_604_915));
        assert_eq!(partitioner.partition(b"Key1"), Token(1_531_023_891));
        assert_eq!(partitioner.partition(b"user123"), Token(1_722_460_251));
        assert_eq!(partitioner.name(), "Murmur3CompatPartitioner");
        assert_eq!(partitioner.seed(), Murmur3Partitioner::DEFAULT_SEED);
    }

    #[test]
    fn test_compat_ignores_trailing_bytes() {
        let partitioner = Murmur3Partitioner::compat();
        let key10 = partitioner.partition(b"Key10");
        assert_eq!(key10, Token(2_094_504_656));
        for i in 11..20 {
            assert_eq!(partitioner.partition(format!("Key{i}").as_bytes()), key10);
        }
        // The reference variant keeps them apart.
        let reference = Murmur3Partitioner::new();
        assert_ne!(reference.partition(b"Key10"), reference.partition(b"Key11"));
    }
}
