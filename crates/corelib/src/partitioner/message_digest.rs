//! Digest-derived partitioners.
//!
//! A message digest is computed over the key and folded into a ring token.
//! The fold is an explicit, documented function so the resulting
//! distribution can be reproduced and analysed independently of any
//! platform hashing utility.

use std::fmt;
use std::marker::PhantomData;

use digest::Digest;
use serde::{Deserialize, Serialize};

use crate::partitioner::traits::Partitioner;
use crate::token::Token;

/// How digest bytes are reduced to a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestFold {
    /// `h = 31 * h + b` over the digest bytes read as signed, starting from
    /// `h = 1`, in wrapping 32-bit arithmetic; the token is the magnitude of
    /// the signed result. `i32::MIN` has magnitude 2^31, so tokens span
    /// `0..=2^31`.
    Polynomial31,
    /// First four digest bytes as a little-endian `u32` (ketama style).
    LeadingWord,
}

impl DigestFold {
    /// Largest token this fold can produce.
    pub fn max_token(self) -> Token {
        match self {
            DigestFold::Polynomial31 => Token(1 << 31),
            DigestFold::LeadingWord => Token(u64::from(u32::MAX)),
        }
    }

    /// Reduce `digest` to a token.
    pub fn fold(self, digest: &[u8]) -> Token {
        match self {
            DigestFold::Polynomial31 => Token(u64::from(fold_polynomial31(digest))),
            DigestFold::LeadingWord => {
                let mut word = [0u8; 4];
                let n = digest.len().min(4);
                word[..n].copy_from_slice(&digest[..n]);
                Token(u64::from(u32::from_le_bytes(word)))
            }
        }
    }
}

/// Polynomial fold of `bytes` with multiplier 31 over signed bytes, sign
/// normalized to a magnitude.
pub fn fold_polynomial31(bytes: &[u8]) -> u32 {
    let h = bytes.iter().fold(1i32, |h, &b| {
        h.wrapping_mul(31).wrapping_add(i32::from(b as i8))
    });
    h.unsigned_abs()
}

/// Partitioner that hashes keys through a message digest `D`.
pub struct DigestPartitioner<D> {
    name: &'static str,
    fold: DigestFold,
    _digest: PhantomData<fn() -> D>,
}

/// MD5-backed digest partitioner.
pub type Md5Partitioner = DigestPartitioner<md5::Md5>;

impl<D: Digest + 'static> DigestPartitioner<D> {
    /// Create a partitioner over digest `D`, reported under `name`.
    pub fn new(name: &'static str, fold: DigestFold) -> Self {
        Self {
            name,
            fold,
            _digest: PhantomData,
        }
    }

    pub fn fold(&self) -> DigestFold {
        self.fold
    }
}

impl DigestPartitioner<md5::Md5> {
    /// MD5 folded with [`DigestFold::Polynomial31`].
    pub fn md5() -> Self {
        Self::new("Md5Partitioner", DigestFold::Polynomial31)
    }

    /// MD5 folded with [`DigestFold::LeadingWord`].
    pub fn md5_ketama() -> Self {
        Self::new("Md5KetamaPartitioner", DigestFold::LeadingWord)
    }
}

impl<D> Clone for DigestPartitioner<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            fold: self.fold,
            _digest: PhantomData,
        }
    }
}

impl<D> fmt::Debug for DigestPartitioner<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestPartitioner")
            .field("name", &self.name)
            .field("fold", &self.fold)
            .finish()
    }
}

impl<D: Digest + 'static> Partitioner for DigestPartitioner<D> {
    fn partition(&self, key: &[u8]) -> Token {
        let digest = D::digest(key);
        self.fold.fold(digest.as_slice())
    }

    fn max_token(&self) -> Token {
        self.fold.max_token()
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
