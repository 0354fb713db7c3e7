use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{CliArgs, Config, ConfigSource, Defaults, RunnerConfig, ServerConfig};
use p4stream_utils::error::ConfigError;

/// Environment variables consulted during discovery, mapped to config keys.
pub const ENV_KEYS: &[(&str, &str)] = &[("P4PORT", "port"), ("P4USER", "user"), ("P4CLIENT", "client")];

const CONFIG_DIR: &str = ".p4stream";
const CONFIG_FILE: &str = "config.toml";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlConfig {
    server: Option<ServerConfig>,
    runner: Option<RunnerConfig>,
    defaults: Option<Defaults>,
}

fn set_if_some<T: Clone>(
    target: &mut Option<T>,
    value: Option<&T>,
    key: &str,
    source: &ConfigSource,
    attribution: &mut HashMap<String, ConfigSource>,
) {
    if let Some(value) = value {
        *target = Some(value.clone());
        attribution.insert(key.to_string(), source.clone());
    }
}

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// Uses the current working directory for upward config discovery, then
    /// falls back to the per-user config directory.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        let env: HashMap<String, String> = ENV_KEYS
            .iter()
            .filter_map(|(var, _)| std::env::var(var).ok().map(|v| ((*var).to_string(), v)))
            .collect();

        if cli_args.config_path.is_none()
            && Self::discover_config_file_from(&start_dir)?.is_none()
            && let Some(user_config) = Self::user_config_file()
        {
            let with_user_file = CliArgs {
                config_path: Some(user_config),
                ..cli_args.clone()
            };
            return Self::discover_from(&start_dir, &with_user_file, &env);
        }

        Self::discover_from(&start_dir, cli_args, &env)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests to avoid process-global
    /// state: the environment is passed in rather than read.
    pub fn discover_from(
        start_dir: &Path,
        cli_args: &CliArgs,
        env: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut source_attribution = HashMap::new();

        let mut server = ServerConfig::default();
        let mut runner = RunnerConfig::default();
        let mut defaults = Defaults::default();

        for key in ["p4_bin", "command_timeout", "verbose", "output_format"] {
            source_attribution.insert(key.to_string(), ConfigSource::Default);
        }

        let config_path = if let Some(explicit_path) = &cli_args.config_path {
            if !explicit_path.exists() {
                return Err(ConfigError::NotFound {
                    path: explicit_path.display().to_string(),
                }
                .into());
            }
            Some(explicit_path.clone())
        } else {
            Self::discover_config_file_from(start_dir)?
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            let src = ConfigSource::Config;
            let attr = &mut source_attribution;

            if let Some(file_server) = file_config.server {
                set_if_some(&mut server.port, file_server.port.as_ref(), "port", &src, attr);
                set_if_some(&mut server.user, file_server.user.as_ref(), "user", &src, attr);
                set_if_some(&mut server.client, file_server.client.as_ref(), "client", &src, attr);
            }
            if let Some(file_runner) = file_config.runner {
                set_if_some(&mut runner.p4_bin, file_runner.p4_bin.as_ref(), "p4_bin", &src, attr);
                set_if_some(
                    &mut runner.command_timeout,
                    file_runner.command_timeout.as_ref(),
                    "command_timeout",
                    &src,
                    attr,
                );
            }
            if let Some(file_defaults) = file_config.defaults {
                set_if_some(&mut defaults.verbose, file_defaults.verbose.as_ref(), "verbose", &src, attr);
                set_if_some(
                    &mut defaults.output_format,
                    file_defaults.output_format.as_ref(),
                    "output_format",
                    &src,
                    attr,
                );
            }
        }

        // Environment overrides the file
        for (var, key) in ENV_KEYS {
            let Some(value) = env.get(*var).filter(|v| !v.is_empty()) else {
                continue;
            };
            let slot = match *key {
                "port" => &mut server.port,
                "user" => &mut server.user,
                _ => &mut server.client,
            };
            set_if_some(slot, Some(value), key, &ConfigSource::Env, &mut source_attribution);
        }

        // CLI overrides everything
        let src = ConfigSource::Cli;
        let attr = &mut source_attribution;
        set_if_some(&mut server.port, cli_args.port.as_ref(), "port", &src, attr);
        set_if_some(&mut server.user, cli_args.user.as_ref(), "user", &src, attr);
        set_if_some(&mut server.client, cli_args.client.as_ref(), "client", &src, attr);
        set_if_some(&mut runner.p4_bin, cli_args.p4_bin.as_ref(), "p4_bin", &src, attr);
        set_if_some(
            &mut runner.command_timeout,
            cli_args.command_timeout.as_ref(),
            "command_timeout",
            &src,
            attr,
        );
        // --verbose is a plain switch; only an explicit `true` overrides the file
        if cli_args.verbose == Some(true) {
            set_if_some(&mut defaults.verbose, Some(&true), "verbose", &src, attr);
        }
        set_if_some(
            &mut defaults.output_format,
            cli_args.output_format.as_ref(),
            "output_format",
            &src,
            attr,
        );

        let config = Self {
            server,
            runner,
            defaults,
            source_attribution,
        };

        config.validate()?;

        Ok(config)
    }

    /// Discover config file by searching upward from a given directory
    ///
    /// Walks up the directory tree looking for `.p4stream/config.toml`, stopping
    /// at repository root markers (.git, .hg, .svn, .p4config) or filesystem root.
    pub fn discover_config_file_from(start_dir: &Path) -> Result<Option<PathBuf>> {
        let mut current_dir = start_dir.to_path_buf();

        loop {
            let config_path = current_dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Ok(Some(config_path));
            }

            if [".git", ".hg", ".svn", ".p4config"]
                .iter()
                .any(|marker| current_dir.join(marker).exists())
            {
                break;
            }

            match current_dir.parent() {
                Some(parent) => current_dir = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Per-user fallback: `<config_dir>/p4stream/config.toml`, if it exists.
    fn user_config_file() -> Option<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("p4stream").join(CONFIG_FILE))
            .filter(|path| path.exists())
    }

    /// Load configuration from TOML file
    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: TomlConfig = toml::from_str(&content).map_err(|e| {
            ConfigError::InvalidFile(format!("{}: {}", path.display(), e.message()))
        })?;
        Ok(config)
    }
}
