use std::path::PathBuf;

/// CLI arguments that feed configuration resolution.
///
/// Every field is optional; `None` leaves the lower-precedence value in place.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub port: Option<String>,
    pub user: Option<String>,
    pub client: Option<String>,
    pub p4_bin: Option<String>,
    pub command_timeout: Option<u64>,
    pub verbose: Option<bool>,
    pub output_format: Option<String>,
}
