//! Ring configuration.
//!
//! Configuration is plain serde data so it can be embedded in a larger
//! service config or read from a JSON file on its own:
//!
//! ```json
//! { "virtual_nodes": 5, "partitioner": "md5", "separator": "-VN" }
//! ```
//!
//! Missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::partitioner::PartitionerKind;
use crate::vnode::DEFAULT_SEPARATOR;

/// Default number of virtual nodes per physical node.
pub const DEFAULT_VIRTUAL_NODES: usize = 256;

/// Settings a ring is constructed from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingConfig {
    /// Positions placed per physical node. Must be at least 1.
    pub virtual_nodes: usize,
    /// Hash strategy for both node placement and key lookup.
    pub partitioner: PartitionerKind,
    /// Inserted between node name and vnode index before hashing.
    pub separator: String,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            virtual_nodes: DEFAULT_VIRTUAL_NODES,
            partitioner: PartitionerKind::default(),
            separator: DEFAULT_SEPARATOR.to_owned(),
        }
    }
}

impl RingConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.virtual_nodes == 0 {
            return Err(Error::InvalidVirtualNodeCount(self.virtual_nodes));
        }
        Ok(())
    }
}
