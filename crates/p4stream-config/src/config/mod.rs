//! Configuration management for p4stream
//!
//! This module provides hierarchical configuration with discovery and precedence:
//! CLI > environment > file > defaults. Supports TOML configuration files with
//! `[server]`, `[runner]`, and `[defaults]` sections.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use discovery::ENV_KEYS;
pub use model::*;
pub use p4stream_utils::types::ConfigSource;

use std::time::Duration;

impl Config {
    /// The p4 executable to invoke. Defaults to `p4` on PATH.
    #[must_use]
    pub fn p4_bin(&self) -> &str {
        self.runner.p4_bin.as_deref().unwrap_or(DEFAULT_P4_BIN)
    }

    /// Timeout applied to every depot command.
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(
            self.runner
                .command_timeout
                .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS),
        )
    }

    #[must_use]
    pub fn port(&self) -> Option<&str> {
        self.server.port.as_deref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.server.user.as_deref()
    }

    #[must_use]
    pub fn client(&self) -> Option<&str> {
        self.server.client.as_deref()
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.defaults.verbose.unwrap_or(false)
    }

    /// True when command output should be emitted as JSON.
    #[must_use]
    pub fn json_output(&self) -> bool {
        self.defaults.output_format.as_deref() == Some("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p4stream_utils::types::ConfigSource;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    fn write_config(dir: &TempDir, body: &str) {
        let cfg_dir = dir.path().join(".p4stream");
        fs::create_dir_all(&cfg_dir).unwrap();
        fs::write(cfg_dir.join("config.toml"), body).unwrap();
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let config = Config::discover_from(dir.path(), &CliArgs::default(), &no_env()).unwrap();

        assert_eq!(config.p4_bin(), "p4");
        assert_eq!(config.command_timeout(), Duration::from_secs(120));
        assert_eq!(config.user(), None);
        assert!(!config.verbose());
        assert!(!config.json_output());
        assert_eq!(
            config.source_attribution.get("p4_bin"),
            Some(&ConfigSource::Default)
        );
    }

    #[test]
    fn test_file_values_are_loaded() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
[server]
port = "ssl:perforce:1666"
user = "builder"

[runner]
p4_bin = "/opt/p4/bin/p4"
command_timeout = 30

[defaults]
output_format = "json"
"#,
        );

        let config = Config::discover_from(dir.path(), &CliArgs::default(), &no_env()).unwrap();

        assert_eq!(config.port(), Some("ssl:perforce:1666"));
        assert_eq!(config.user(), Some("builder"));
        assert_eq!(config.p4_bin(), "/opt/p4/bin/p4");
        assert_eq!(config.command_timeout(), Duration::from_secs(30));
        assert!(config.json_output());
        assert_eq!(
            config.source_attribution.get("user"),
            Some(&ConfigSource::Config)
        );
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
[server]
port = "file:1666"
user = "file-user"
client = "file-ws"
"#,
        );
        let env: HashMap<String, String> = [
            ("P4PORT".to_string(), "env:1666".to_string()),
            ("P4USER".to_string(), "env-user".to_string()),
        ]
        .into_iter()
        .collect();
        let cli = CliArgs {
            user: Some("cli-user".to_string()),
            ..CliArgs::default()
        };

        let config = Config::discover_from(dir.path(), &cli, &env).unwrap();

        assert_eq!(config.user(), Some("cli-user"));
        assert_eq!(config.port(), Some("env:1666"));
        assert_eq!(config.client(), Some("file-ws"));
        assert_eq!(config.source_attribution.get("user"), Some(&ConfigSource::Cli));
        assert_eq!(config.source_attribution.get("port"), Some(&ConfigSource::Env));
        assert_eq!(
            config.source_attribution.get("client"),
            Some(&ConfigSource::Config)
        );
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let env: HashMap<String, String> =
            [("P4USER".to_string(), String::new())].into_iter().collect();

        let config = Config::discover_from(dir.path(), &CliArgs::default(), &env).unwrap();
        assert_eq!(config.user(), None);
    }

    #[test]
    fn test_discovery_walks_upward() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[server]\nuser = \"upward\"\n");
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = Config::discover_config_file_from(&nested).unwrap();
        assert_eq!(found, Some(dir.path().join(".p4stream").join("config.toml")));
    }

    #[test]
    fn test_discovery_stops_at_repository_root() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[server]\nuser = \"outside\"\n");
        let repo = dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        let found = Config::discover_config_file_from(&repo).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let cli = CliArgs {
            config_path: Some(dir.path().join("nope.toml")),
            ..CliArgs::default()
        };

        assert!(Config::discover_from(dir.path(), &cli, &no_env()).is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[server\nuser = ");

        let err = Config::discover_from(dir.path(), &CliArgs::default(), &no_env()).unwrap_err();
        assert!(format!("{err:#}").contains("config"));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let cli = CliArgs {
            command_timeout: Some(0),
            ..CliArgs::default()
        };

        assert!(Config::discover_from(dir.path(), &cli, &no_env()).is_err());
    }

    #[test]
    fn test_effective_config_reports_sources() {
        let config = Config::builder()
            .user("alice")
            .command_timeout(Duration::from_secs(45))
            .build()
            .unwrap();

        let effective = config.effective_config();
        assert_eq!(
            effective.get("user"),
            Some(&("alice".to_string(), "programmatic".to_string()))
        );
        assert_eq!(
            effective.get("command_timeout"),
            Some(&("45".to_string(), "programmatic".to_string()))
        );
        assert_eq!(
            effective.get("p4_bin"),
            Some(&("p4".to_string(), "default".to_string()))
        );
    }
}
