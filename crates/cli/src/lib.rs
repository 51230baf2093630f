//! Command-line front end for the hash ring.
//!
//! Provides commands for:
//! - Replaying the add/remove demo and reporting moved keys
//! - Locating keys and inspecting ring ownership
//! - Measuring key distribution
//! - Shortening URLs into ring-routed shards

pub mod commands;
pub mod config;

pub use commands::{Assignment, Command, CommandResult, Phase};
pub use config::CliConfig;
