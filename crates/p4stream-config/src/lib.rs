//! Configuration for p4stream
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > environment (`P4PORT`, `P4USER`, `P4CLIENT`) > file > defaults.

pub mod config;

pub use config::{CliArgs, Config, ConfigBuilder, Defaults, RunnerConfig, ServerConfig};
pub use p4stream_utils::types::ConfigSource;
