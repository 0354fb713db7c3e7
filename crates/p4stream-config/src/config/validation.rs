use p4stream_utils::error::{ConfigError, P4StreamError};

use super::{Config, MAX_COMMAND_TIMEOUT_SECS, OUTPUT_FORMATS};

fn invalid(key: &str, value: impl Into<String>) -> P4StreamError {
    P4StreamError::Config(ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    })
}

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), P4StreamError> {
        if let Some(timeout) = self.runner.command_timeout {
            if timeout == 0 {
                return Err(invalid("command_timeout", "must be greater than 0"));
            }
            if timeout > MAX_COMMAND_TIMEOUT_SECS {
                return Err(invalid(
                    "command_timeout",
                    format!("exceeds maximum limit of {MAX_COMMAND_TIMEOUT_SECS} seconds"),
                ));
            }
        }

        if let Some(p4_bin) = &self.runner.p4_bin
            && p4_bin.trim().is_empty()
        {
            return Err(invalid("p4_bin", "must not be empty"));
        }

        if let Some(format) = &self.defaults.output_format
            && !OUTPUT_FORMATS.contains(&format.as_str())
        {
            return Err(invalid(
                "output_format",
                format!("'{format}' is not one of: {}", OUTPUT_FORMATS.join(", ")),
            ));
        }

        for (key, value) in [
            ("port", &self.server.port),
            ("user", &self.server.user),
            ("client", &self.server.client),
        ] {
            if let Some(value) = value
                && value.trim().is_empty()
            {
                return Err(invalid(key, "must not be blank"));
            }
        }

        Ok(())
    }
}
