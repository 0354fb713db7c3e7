use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use p4stream_utils::types::ConfigSource;

/// Default depot client executable
pub const DEFAULT_P4_BIN: &str = "p4";

/// Default per-command timeout in seconds
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 120;

/// Upper bound for `runner.command_timeout`
pub const MAX_COMMAND_TIMEOUT_SECS: u64 = 3600;

/// Output formats accepted by `defaults.output_format`
pub const OUTPUT_FORMATS: &[&str] = &["table", "json"];

/// `[server]` section: how to reach the depot server
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server address, e.g. `ssl:perforce:1666` (P4PORT)
    pub port: Option<String>,
    /// Depot user; owns newly created streams (P4USER)
    pub user: Option<String>,
    /// Workspace used for commands that need one (P4CLIENT)
    pub client: Option<String>,
}

/// `[runner]` section: how depot commands are executed
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Path or name of the p4 executable
    pub p4_bin: Option<String>,
    /// Timeout for a single depot command, in seconds
    pub command_timeout: Option<u64>,
}

/// `[defaults]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Defaults {
    pub verbose: Option<bool>,
    /// `table` or `json`
    pub output_format: Option<String>,
}

/// Resolved configuration with per-key source attribution.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub runner: RunnerConfig,
    pub defaults: Defaults,
    pub source_attribution: HashMap<String, ConfigSource>,
}
