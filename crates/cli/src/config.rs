//! Command-line configuration.
//!
//! Ring settings are resolved in three layers: the command's defaults, an
//! optional JSON file given with `--config`, then individual flags.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use corelib::{PartitionerKind, RingConfig};
use tracing::debug;

use crate::commands::Command;

/// Inspect and exercise a consistent hash ring.
#[derive(Debug, Parser)]
#[command(name = "ring", version)]
pub struct CliConfig {
    /// JSON ring configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Virtual nodes per physical node.
    #[arg(long, global = true)]
    pub vnodes: Option<usize>,

    /// Hash strategy: murmur3, murmur3-compat, md5, md5-ketama, blake3, xxh3, siphash.
    #[arg(long, global = true)]
    pub partitioner: Option<PartitionerKind>,

    /// Separator between node name and vnode index when placing vnodes.
    #[arg(long, global = true)]
    pub separator: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log level for diagnostics written to stderr.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Resolve the ring configuration for the selected command.
    pub fn ring_config(&self) -> anyhow::Result<RingConfig> {
        let mut config = match &self.config {
            Some(path) => RingConfig::from_file(path)
                .with_context(|| format!("loading ring config from {}", path.display()))?,
            None => self.command.default_ring_config(),
        };

        if let Some(vnodes) = self.vnodes {
            config.virtual_nodes = vnodes;
        }
        if let Some(partitioner) = self.partitioner {
            config.partitioner = partitioner;
        }
        if let Some(separator) = &self.separator {
            config.separator = separator.clone();
        }

        config.validate().context("invalid ring configuration")?;
        Ok(config)
    }

    /// Install logging, run the command and print its result.
    pub fn run(self) -> anyhow::Result<()> {
        tracing_subscriber::fmt()
            .with_max_level(self.log_level)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))?;

        let ring_config = self.ring_config()?;
        debug!(?ring_config, "resolved ring configuration");

        let result = self.command.execute(&ring_config)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{result}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = CliConfig::try_parse_from([
            "ring",
            "locate",
            "--nodes",
            "a,b",
            "--vnodes",
            "7",
            "--partitioner",
            "md5",
            "k1",
        ])
        .unwrap();
        let config = cli.ring_config().unwrap();
        assert_eq!(config.virtual_nodes, 7);
        assert_eq!(config.partitioner, PartitionerKind::Md5);
        assert_eq!(config.separator, "-VN");
    }

    #[test]
    fn test_demo_defaults_to_five_vnodes() {
        let cli = CliConfig::try_parse_from(["ring", "demo"]).unwrap();
        assert_eq!(cli.ring_config().unwrap().virtual_nodes, 5);
    }

    #[test]
    fn test_zero_vnodes_rejected() {
        let cli = CliConfig::try_parse_from(["ring", "demo", "--vnodes", "0"]).unwrap();
        assert!(cli.ring_config().is_err());
    }

    #[test]
    fn test_unknown_partitioner_rejected_at_parse() {
        assert!(CliConfig::try_parse_from(["ring", "demo", "--partitioner", "crc32"]).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let cli =
            CliConfig::try_parse_from(["ring", "demo", "--config", "/nonexistent/ring.json"]).unwrap();
        let err = cli.ring_config().unwrap_err();
        assert!(err.to_string().contains("loading ring config"));
    }
}
