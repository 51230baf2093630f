//! The sharded shortener.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use corelib::{HashRing, NodeId};
use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

use crate::base62;
use crate::error::{Result, ShortenerError};

/// Prefix used for short URLs when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://short.ly/";

/// A stored short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortLink {
    pub id: u64,
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    /// Node whose table holds the mapping.
    pub shard: NodeId,
}

/// Shortens URLs into per-node tables chosen by a hash ring.
///
/// The ring is owned and never mutated after construction: a membership
/// change would reroute existing codes to tables that do not hold them.
#[derive(Debug)]
pub struct Shortener {
    base_url: String,
    next_id: AtomicU64,
    ring: HashRing,
    shards: DashMap<NodeId, HashMap<String, String>>,
}

impl Shortener {
    pub fn new(base_url: impl Into<String>, ring: HashRing) -> Self {
        Self {
            base_url: base_url.into(),
            next_id: AtomicU64::new(1),
            ring,
            shards: DashMap::new(),
        }
    }

    pub fn with_default_base(ring: HashRing) -> Self {
        Self::new(DEFAULT_BASE_URL, ring)
    }

    /// Assign the next id to `long_url` and store it on the owning shard.
    ///
    /// # Errors
    ///
    /// Fails if the ring has no nodes to route to. No id is consumed then,
    /// so ids stay gap-free.
    pub fn shorten(&self, long_url: &str) -> Result<ShortLink> {
        // The ring never changes after construction, so a non-empty ring
        // routes every code.
        if self.ring.is_empty() {
            return Err(corelib::Error::EmptyRing.into());
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let code = base62::encode(id);
        let shard = self.ring.locate(&code)?;

        self.shards
            .entry(shard.clone())
            .or_default()
            .insert(code.clone(), long_url.to_owned());
        debug!(id, code = %code, %shard, "stored short link");

        Ok(ShortLink {
            id,
            short_url: format!("{}{}", self.base_url, code),
            code,
            long_url: long_url.to_owned(),
            shard,
        })
    }

    /// Look up the original URL for a short URL or bare code.
    pub fn resolve(&self, short: &str) -> Result<String> {
        let code = self.code_of(short);
        base62::decode(code)?;
        let shard = self.ring.locate(code)?;
        self.shards
            .get(&shard)
            .and_then(|table| table.get(code).cloned())
            .ok_or_else(|| ShortenerError::NotFound(code.to_owned()))
    }

    /// The node a code is routed to.
    pub fn shard_for(&self, code: &str) -> Result<NodeId> {
        Ok(self.ring.locate(self.code_of(code))?)
    }

    /// Number of links held by each shard.
    pub fn shard_sizes(&self) -> BTreeMap<NodeId, usize> {
        self.shards
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().len()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn code_of<'a>(&self, short: &'a str) -> &'a str {
        short.strip_prefix(self.base_url.as_str()).unwrap_or(short)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::ring::RingBuilder;

    fn shortener() -> Shortener {
        let ring = RingBuilder::new()
            .with_vnodes(16)
            .add_nodes(["shard-a", "shard-b", "shard-c"])
            .build()
            .unwrap();
        Shortener::with_default_base(ring)
    }

    #[test]
    fn test_ids_start_at_one() {
        let shortener = shortener();
        let first = shortener.shorten("https://example.com/my-long-url").unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.code, "b");
        assert_eq!(first.short_url, "https://short.ly/b");

        let second = shortener.shorten("https://example.com/other").unwrap();
        assert_eq!(second.code, "c");
    }

    #[test]
    fn test_resolve_round_trip() {
        let shortener = shortener();
        let link = shortener.shorten("https://example.com/my-long-url").unwrap();

        assert_eq!(
            shortener.resolve(&link.short_url).unwrap(),
            "https://example.com/my-long-url"
        );
        assert_eq!(
            shortener.resolve(&link.code).unwrap(),
            "https://example.com/my-long-url"
        );
        assert_eq!(shortener.shard_for(&link.code).unwrap(), link.shard);
    }

    #[test]
    fn test_resolve_missing_and_invalid() {
        let shortener = shortener();
        assert!(matches!(
            shortener.resolve("https://short.ly/zzz"),
            Err(ShortenerError::NotFound(_))
        ));
        assert!(matches!(
            shortener.resolve("https://short.ly/no-such"),
            Err(ShortenerError::InvalidCode(_))
        ));
    }

    #[test]
    fn test_links_spread_over_shards() {
        let shortener = shortener();
        for i in 0..300 {
            shortener.shorten(&format!("https://example.com/{i}")).unwrap();
        }
        let sizes = shortener.shard_sizes();
        assert_eq!(shortener.len(), 300);
        assert_eq!(sizes.values().sum::<usize>(), 300);
        assert!(sizes.len() > 1, "links should land on more than one shard: {sizes:?}");
    }

    #[test]
    fn test_empty_ring_cannot_shorten() {
        let ring = RingBuilder::new().with_vnodes(4).build().unwrap();
        let shortener = Shortener::with_default_base(ring);
        for _ in 0..3 {
            assert!(matches!(
                shortener.shorten("https://example.com"),
                Err(ShortenerError::Ring(corelib::Error::EmptyRing))
            ));
        }
        assert!(shortener.is_empty());
        // Failed calls leave the counter untouched.
        assert_eq!(shortener.next_id.load(Ordering::Relaxed), 1);
    }
}
