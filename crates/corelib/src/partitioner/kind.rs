//! Named partitioner selection for configuration files and command lines.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::partitioner::{
    Blake3Partitioner, Md5Partitioner, Murmur3Partitioner, Partitioner, SipPartitioner,
    Xxh3Partitioner,
};

/// The hash strategies a ring can be configured with by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartitionerKind {
    #[default]
    Murmur3,
    Murmur3Compat,
    Md5,
    Md5Ketama,
    Blake3,
    Xxh3,
    Siphash,
}

impl PartitionerKind {
    pub const ALL: [PartitionerKind; 7] = [
        PartitionerKind::Murmur3,
        PartitionerKind::Murmur3Compat,
        PartitionerKind::Md5,
        PartitionerKind::Md5Ketama,
        PartitionerKind::Blake3,
        PartitionerKind::Xxh3,
        PartitionerKind::Siphash,
    ];

    /// Instantiate the strategy with its default parameters.
    pub fn build(self) -> Arc<dyn Partitioner> {
        match self {
            PartitionerKind::Murmur3 => Arc::new(Murmur3Partitioner::new()),
            PartitionerKind::Murmur3Compat => Arc::new(Murmur3Partitioner::compat()),
            PartitionerKind::Md5 => Arc::new(Md5Partitioner::md5()),
            PartitionerKind::Md5Ketama => Arc::new(Md5Partitioner::md5_ketama()),
            PartitionerKind::Blake3 => Arc::new(Blake3Partitioner),
            PartitionerKind::Xxh3 => Arc::new(Xxh3Partitioner::default()),
            PartitionerKind::Siphash => Arc::new(SipPartitioner::default()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PartitionerKind::Murmur3 => "murmur3",
            PartitionerKind::Murmur3Compat => "murmur3-compat",
            PartitionerKind::Md5 => "md5",
            PartitionerKind::Md5Ketama => "md5-ketama",
            PartitionerKind::Blake3 => "blake3",
            PartitionerKind::Xxh3 => "xxh3",
            PartitionerKind::Siphash => "siphash",
        }
    }
}

impl fmt::Display for PartitionerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PartitionerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = PartitionerKind::ALL.iter().map(|k| k.as_str()).collect();
                Error::Config(format!(
                    "unknown partitioner '{s}', expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}
