use std::collections::HashMap;
use std::time::Duration;

use p4stream_utils::error::P4StreamError;

use super::{Config, ConfigSource, Defaults, RunnerConfig, ServerConfig};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding p4stream without environment variables or
    /// config files.
    ///
    /// # Example
    ///
    /// ```rust
    /// use p4stream_config::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .port("ssl:perforce:1666")
    ///     .user("builder")
    ///     .command_timeout(Duration::from_secs(60))
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.user(), Some("builder"));
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration.
///
/// All values set via the builder are attributed to
/// `ConfigSource::Programmatic`; everything else reports `Default`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    port: Option<String>,
    user: Option<String>,
    client: Option<String>,
    p4_bin: Option<String>,
    command_timeout: Option<Duration>,
    verbose: Option<bool>,
    output_format: Option<String>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Server address (P4PORT).
    #[must_use]
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Depot user (P4USER); owns streams created through this config.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Workspace name (P4CLIENT).
    #[must_use]
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Path or name of the p4 executable.
    #[must_use]
    pub fn p4_bin(mut self, p4_bin: impl Into<String>) -> Self {
        self.p4_bin = Some(p4_bin.into());
        self
    }

    /// Timeout for each depot command. Sub-second precision is dropped.
    #[must_use]
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// `table` or `json`.
    #[must_use]
    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<Config, P4StreamError> {
        let mut source_attribution = HashMap::new();
        let mut mark = |key: &str, set: bool| {
            let source = if set {
                ConfigSource::Programmatic
            } else {
                ConfigSource::Default
            };
            source_attribution.insert(key.to_string(), source);
        };

        mark("port", self.port.is_some());
        mark("user", self.user.is_some());
        mark("client", self.client.is_some());
        mark("p4_bin", self.p4_bin.is_some());
        mark("command_timeout", self.command_timeout.is_some());
        mark("verbose", self.verbose.is_some());
        mark("output_format", self.output_format.is_some());

        let config = Config {
            server: ServerConfig {
                port: self.port,
                user: self.user,
                client: self.client,
            },
            runner: RunnerConfig {
                p4_bin: self.p4_bin,
                command_timeout: self.command_timeout.map(|d| d.as_secs()),
            },
            defaults: Defaults {
                verbose: self.verbose,
                output_format: self.output_format,
            },
            source_attribution,
        };

        config.validate()?;
        Ok(config)
    }
}
