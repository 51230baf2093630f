//! CLI subcommands and their results.

use std::collections::BTreeMap;
use std::fmt;

use clap::Subcommand;
use corelib::{HashRing, NodeId, Remap, RingConfig, Token, TokenRange, Topology};
use serde::Serialize;
use shortener::{ShortLink, Shortener, DEFAULT_BASE_URL};
use tracing::info;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Map keys, add a node, remove a node, and show what moved.
    Demo {
        /// Initial nodes.
        #[arg(long, value_delimiter = ',', default_value = "NodeA,NodeB,NodeC")]
        nodes: Vec<String>,
        /// Node added in the second phase.
        #[arg(long, default_value = "NodeD")]
        add: String,
        /// Node removed in the third phase.
        #[arg(long, default_value = "NodeB")]
        remove: String,
        /// Number of keys, named Key1..KeyN.
        #[arg(long, default_value_t = 10)]
        keys: usize,
    },
    /// Report the owner of each key.
    Locate {
        #[arg(long, value_delimiter = ',', required = true)]
        nodes: Vec<String>,
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// List ring positions and the share of hash space each node owns.
    Inspect {
        #[arg(long, value_delimiter = ',', required = true)]
        nodes: Vec<String>,
    },
    /// Count how many synthetic keys each node receives.
    Distribution {
        #[arg(long, value_delimiter = ',', required = true)]
        nodes: Vec<String>,
        #[arg(long, default_value_t = 10_000)]
        keys: usize,
    },
    /// Shorten URLs into ring-routed shard tables.
    Shorten {
        #[arg(long, value_delimiter = ',', default_value = "shard-a,shard-b,shard-c")]
        nodes: Vec<String>,
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

/// Owner of one key at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub key: String,
    /// `None` when the ring was empty.
    pub position: Option<Token>,
    pub node: Option<NodeId>,
}

/// Key ownership after one membership step of the demo.
#[derive(Debug, Clone, Serialize)]
pub struct Phase {
    pub label: String,
    pub assignments: Vec<Assignment>,
    /// Keys whose owner changed relative to the previous phase.
    pub remaps: Vec<Remap>,
}

/// Output of a command, printable as text or JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandResult {
    Demo {
        phases: Vec<Phase>,
    },
    Locate {
        assignments: Vec<Assignment>,
    },
    Inspect {
        partitioner: String,
        virtual_nodes: usize,
        ranges: Vec<TokenRange>,
        ownership: BTreeMap<NodeId, f64>,
        spread: Option<f64>,
    },
    Distribution {
        keys: usize,
        counts: BTreeMap<NodeId, usize>,
        ownership: BTreeMap<NodeId, f64>,
    },
    Shorten {
        links: Vec<ShortLink>,
        shard_sizes: BTreeMap<NodeId, usize>,
    },
}

impl Command {
    /// Ring settings used when neither a config file nor flags override them.
    pub fn default_ring_config(&self) -> RingConfig {
        match self {
            // The demo is small enough to read: five positions per node.
            Command::Demo { .. } => RingConfig {
                virtual_nodes: 5,
                ..RingConfig::default()
            },
            _ => RingConfig::default(),
        }
    }

    pub fn execute(&self, config: &RingConfig) -> anyhow::Result<CommandResult> {
        match self {
            Command::Demo {
                nodes,
                add,
                remove,
                keys,
            } => {
                let ring = build_ring(config, nodes)?;
                let keys: Vec<String> = (1..=*keys).map(|i| format!("Key{i}")).collect();

                let mut phases = vec![Phase {
                    label: format!("initial nodes {}", nodes.join(", ")),
                    assignments: assignments(&ring, &keys),
                    remaps: Vec::new(),
                }];

                let before = ring.snapshot();
                ring.add_node(add);
                info!(node = %add, "demo added node");
                phases.push(Phase {
                    label: format!("after adding {add}"),
                    assignments: assignments(&ring, &keys),
                    remaps: before.owner_changes(&ring.snapshot(), &keys),
                });

                let before = ring.snapshot();
                ring.remove_node(remove);
                info!(node = %remove, "demo removed node");
                phases.push(Phase {
                    label: format!("after removing {remove}"),
                    assignments: assignments(&ring, &keys),
                    remaps: before.owner_changes(&ring.snapshot(), &keys),
                });

                Ok(CommandResult::Demo { phases })
            }
            Command::Locate { nodes, keys } => {
                let ring = build_ring(config, nodes)?;
                Ok(CommandResult::Locate {
                    assignments: assignments(&ring, keys),
                })
            }
            Command::Inspect { nodes } => {
                let ring = build_ring(config, nodes)?;
                let topology = Topology::from_snapshot(&ring.snapshot());
                Ok(CommandResult::Inspect {
                    partitioner: ring.partitioner_name().to_owned(),
                    virtual_nodes: ring.virtual_node_count(),
                    ranges: topology.ranges().to_vec(),
                    ownership: topology.ownership(),
                    spread: topology.spread(),
                })
            }
            Command::Distribution { nodes, keys } => {
                let ring = build_ring(config, nodes)?;
                let snapshot = ring.snapshot();
                let mut counts: BTreeMap<NodeId, usize> =
                    nodes.iter().map(|n| (NodeId::from(n.as_str()), 0)).collect();
                for i in 0..*keys {
                    let node = snapshot.locate(format!("key-{i}"))?;
                    *counts.entry(node.clone()).or_default() += 1;
                }
                Ok(CommandResult::Distribution {
                    keys: *keys,
                    counts,
                    ownership: Topology::from_snapshot(&snapshot).ownership(),
                })
            }
            Command::Shorten {
                nodes,
                base_url,
                urls,
            } => {
                let ring = build_ring(config, nodes)?;
                let shortener = Shortener::new(base_url.clone(), ring);
                let links = urls
                    .iter()
                    .map(|url| shortener.shorten(url))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CommandResult::Shorten {
                    links,
                    shard_sizes: shortener.shard_sizes(),
                })
            }
        }
    }
}

fn build_ring(config: &RingConfig, nodes: &[String]) -> anyhow::Result<HashRing> {
    let ring = HashRing::from_config(config)?;
    for node in nodes {
        let overwritten = ring.add_node(node);
        if overwritten > 0 {
            info!(%node, overwritten, "node overwrote existing positions");
        }
    }
    Ok(ring)
}

fn assignments(ring: &HashRing, keys: &[String]) -> Vec<Assignment> {
    keys.iter()
        .map(|key| {
            let owner = ring.locate_token(key);
            Assignment {
                key: key.clone(),
                position: owner.as_ref().map(|(token, _)| *token),
                node: owner.map(|(_, node)| node),
            }
        })
        .collect()
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.node, self.position) {
            (Some(node), Some(position)) => {
                write!(f, "{} is mapped to {} (position {})", self.key, node, position)
            }
            _ => write!(f, "{} is unmapped (ring empty)", self.key),
        }
    }
}

fn write_remap(f: &mut fmt::Formatter<'_>, remap: &Remap) -> fmt::Result {
    let name = |node: &Option<NodeId>| {
        node.as_ref()
            .map_or_else(|| "(none)".to_owned(), NodeId::to_string)
    };
    writeln!(f, "  moved {}: {} -> {}", remap.key, name(&remap.from), name(&remap.to))
}

fn write_shares(f: &mut fmt::Formatter<'_>, ownership: &BTreeMap<NodeId, f64>) -> fmt::Result {
    for (node, share) in ownership {
        writeln!(f, "  {node}: {:.2}% of hash space", share * 100.0)?;
    }
    Ok(())
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Demo { phases } => {
                for phase in phases {
                    writeln!(f, "--- {} ---", phase.label)?;
                    for assignment in &phase.assignments {
                        writeln!(f, "{assignment}")?;
                    }
                    for remap in &phase.remaps {
                        write_remap(f, remap)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            CommandResult::Locate { assignments } => {
                for assignment in assignments {
                    writeln!(f, "{assignment}")?;
                }
                Ok(())
            }
            CommandResult::Inspect {
                partitioner,
                virtual_nodes,
                ranges,
                ownership,
                spread,
            } => {
                writeln!(
                    f,
                    "{partitioner}, {virtual_nodes} virtual nodes per node, {} positions",
                    ranges.len()
                )?;
                for range in ranges {
                    writeln!(
                        f,
                        "  ({}, {}] -> {} width {}",
                        range.start, range.end, range.node, range.width
                    )?;
                }
                write_shares(f, ownership)?;
                if let Some(spread) = spread {
                    writeln!(f, "  max/min ownership: {spread:.3}")?;
                }
                Ok(())
            }
            CommandResult::Distribution {
                keys,
                counts,
                ownership,
            } => {
                writeln!(f, "{keys} keys")?;
                for (node, count) in counts {
                    let share = if *keys == 0 {
                        0.0
                    } else {
                        *count as f64 * 100.0 / *keys as f64
                    };
                    writeln!(f, "  {node}: {count} keys ({share:.2}%)")?;
                }
                write_shares(f, ownership)
            }
            CommandResult::Shorten { links, shard_sizes } => {
                for link in links {
                    writeln!(
                        f,
                        "{} -> {} (shard {})",
                        link.long_url, link.short_url, link.shard
                    )?;
                }
                for (shard, size) in shard_sizes {
                    writeln!(f, "  {shard}: {size} links")?;
                }
                Ok(())
            }
        }
    }
}
