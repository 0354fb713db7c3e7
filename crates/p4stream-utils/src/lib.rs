pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod types;

pub use error::{
    ConfigError, DepotError, ErrorCategory, LocationProblem, P4StreamError, RunnerError,
    StreamError, UserFriendlyError,
};
pub use exit_codes::ExitCode;
pub use types::ConfigSource;
