use std::collections::BTreeMap;

use super::Config;

impl Config {
    /// Get effective configuration as key-value pairs with source attribution.
    ///
    /// Keys without a value (e.g. no client configured) are omitted.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add_config = |key: &str, value: Option<String>| {
            if let Some(val) = value {
                let source = self
                    .source_attribution
                    .get(key)
                    .map_or("default", |s| s.as_str());
                config.insert(key.to_string(), (val, source.to_string()));
            }
        };

        add_config("port", self.server.port.clone());
        add_config("user", self.server.user.clone());
        add_config("client", self.server.client.clone());
        add_config("p4_bin", Some(self.p4_bin().to_string()));
        add_config(
            "command_timeout",
            Some(self.command_timeout().as_secs().to_string()),
        );
        add_config("verbose", Some(self.verbose().to_string()));
        add_config(
            "output_format",
            Some(
                self.defaults
                    .output_format
                    .clone()
                    .unwrap_or_else(|| "table".to_string()),
            ),
        );

        config
    }
}
