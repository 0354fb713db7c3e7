use std::fmt;
use thiserror::Error;

pub use p4stream_runner::RunnerError;

/// Library-level error type with rich context and user-friendly reporting.
///
/// `P4StreamError` is the error returned at the library/CLI boundary. It
/// provides:
/// - Detailed error information for programmatic handling
/// - User-friendly messages with context and suggestions
/// - Mapping to CLI exit codes for consistent error reporting
///
/// # Exit Code Mapping
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration/CLI argument errors |
/// | 3 | Invalid option vector, stream type or depot path |
/// | 4 | Stream not found |
/// | 10 | Depot command timed out |
/// | 70 | Depot command or server failure |
/// | 1 | Other errors |
///
/// Library code returns `P4StreamError` and does NOT call `std::process::exit()`.
#[derive(Error, Debug)]
pub enum P4StreamError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<DepotError> for P4StreamError {
    fn from(err: DepotError) -> Self {
        Self::Stream(StreamError::Remote(err))
    }
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    NotFound,
    Remote,
    FileSystem,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Validation => write!(f, "Validation"),
            Self::NotFound => write!(f, "Not Found"),
            Self::Remote => write!(f, "Remote"),
            Self::FileSystem => write!(f, "File System"),
            Self::Internal => write!(f, "Internal"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::MissingRequired(key) => {
                format!("Required configuration '{key}' is missing")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => {
                format!("Configuration file not found: {path}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration files must be valid TOML with optional [server], [runner] and [defaults] sections."
                    .to_string(),
            ),
            Self::MissingRequired(_) => {
                Some("The depot connection needs at least a user to own new streams.".to_string())
            }
            Self::InvalidValue { key, .. } => Some(format!(
                "The '{key}' configuration option has specific format requirements."
            )),
            Self::NotFound { .. } => Some(
                "p4stream searches for .p4stream/config.toml starting from the current directory upward."
                    .to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax of the configuration file".to_string(),
                "Run 'p4stream config' to see the effective configuration".to_string(),
            ],
            Self::MissingRequired(key) => vec![
                format!("Set '{key}' in .p4stream/config.toml"),
                "Or export P4USER / P4PORT / P4CLIENT in the environment".to_string(),
            ],
            Self::InvalidValue { .. } => {
                vec!["Correct the value and re-run the command".to_string()]
            }
            Self::NotFound { .. } => vec![
                "Check the path passed to --config".to_string(),
                "Or drop --config to use discovery".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Why a depot location failed the syntactic path rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationProblem {
    Empty,
    MissingRootPrefix,
    RecursiveWildcardSuffix,
}

impl fmt::Display for LocationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "must not be empty"),
            Self::MissingRootPrefix => write!(f, "must begin with '//'"),
            Self::RecursiveWildcardSuffix => write!(f, "must not end with '/...'"),
        }
    }
}

/// Failures surfaced by the command-execution layer.
///
/// The lifecycle core treats every variant as an opaque, terminal remote
/// failure; the variants exist for diagnostics only.
#[derive(Error, Debug)]
pub enum DepotError {
    #[error("depot client '{program}' is not available")]
    NotInstalled { program: String },

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("p4 {args} failed: {message}")]
    CommandFailed { args: String, message: String },

    #[error("server rejected request: {message}")]
    Server { message: String },

    #[error("unable to parse depot output: {0}")]
    Parse(String),
}

/// Errors from the stream lifecycle operations.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("options count is invalid, must be '{expected}' (got {actual})")]
    InvalidArity { expected: usize, actual: usize },

    #[error("option at position {index} must be 0 or 1 (got '{value}')")]
    InvalidOptionValue { index: usize, value: String },

    #[error("stream type '{kind}' should be one of the following '{}'", .allowed.join("', '"))]
    InvalidKind {
        kind: String,
        allowed: Vec<&'static str>,
    },

    #[error("invalid depot path '{location}': {problem}")]
    InvalidLocation {
        location: String,
        problem: LocationProblem,
    },

    #[error("{location} - no such stream.")]
    NotFound { location: String },

    #[error("failed to render stream spec: {0}")]
    Template(String),

    #[error(transparent)]
    Remote(#[from] DepotError),
}

impl StreamError {
    /// True for errors raised before any remote call was attempted.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidArity { .. }
                | Self::InvalidOptionValue { .. }
                | Self::InvalidKind { .. }
                | Self::InvalidLocation { .. }
        )
    }
}

impl UserFriendlyError for StreamError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidArity { expected, actual } => {
                format!("Stream options need exactly {expected} flags, {actual} were given")
            }
            Self::InvalidOptionValue { index, value } => {
                format!("Stream option {index} is '{value}', expected 0 or 1")
            }
            Self::InvalidKind { kind, allowed } => format!(
                "Unknown stream type '{kind}' (allowed: {})",
                allowed.join(", ")
            ),
            Self::InvalidLocation { location, problem } => {
                format!("Depot path '{location}' {problem}")
            }
            Self::NotFound { location } => format!("Stream {location} does not exist"),
            Self::Template(reason) => format!("Could not render stream spec: {reason}"),
            Self::Remote(err) => format!("Depot command failed: {err}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidArity { .. } | Self::InvalidOptionValue { .. } => Some(
                "Flags are, in order: submit (owner/all), lock, to-parent, from-parent, merge (any/down); 0 selects the first form."
                    .to_string(),
            ),
            Self::InvalidLocation { .. } => {
                Some("Stream paths look like //Depot/StreamName.".to_string())
            }
            Self::Remote(_) => Some(
                "Steps completed before the failure are not rolled back; the stream may be in an intermediate state."
                    .to_string(),
            ),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidArity { .. } | Self::InvalidOptionValue { .. } => {
                vec!["Pass five digits, e.g. --options 1,1,0,0,1".to_string()]
            }
            Self::InvalidKind { .. } => {
                vec!["Use --type with one of the listed stream types".to_string()]
            }
            Self::InvalidLocation { .. } => vec![
                "Drop any trailing '/...' from the path".to_string(),
                "Start the path with '//'".to_string(),
            ],
            Self::NotFound { .. } => {
                vec!["Run 'p4stream list' to see existing streams".to_string()]
            }
            Self::Template(_) => Vec::new(),
            Self::Remote(DepotError::NotInstalled { .. }) => vec![
                "Install the p4 command-line client or point --p4-bin at it".to_string(),
            ],
            Self::Remote(DepotError::Runner(RunnerError::Timeout { .. })) => {
                vec!["Raise --timeout or runner.command_timeout".to_string()]
            }
            Self::Remote(_) => vec![
                "Check P4PORT/P4USER and that you are logged in (p4 login)".to_string(),
                "Re-running the whole operation is safe for dependents already removed"
                    .to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Template(_) => ErrorCategory::Internal,
            Self::Remote(_) => ErrorCategory::Remote,
            _ => ErrorCategory::Validation,
        }
    }
}

impl UserFriendlyError for P4StreamError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.user_message(),
            Self::Stream(err) => err.user_message(),
            Self::Io(err) => format!("File system operation failed: {err}"),
            Self::Json(err) => format!("Failed to produce JSON output: {err}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(err) => err.context(),
            Self::Stream(err) => err.context(),
            Self::Io(_) | Self::Json(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(err) => err.suggestions(),
            Self::Stream(err) => err.suggestions(),
            Self::Io(_) | Self::Json(_) => Vec::new(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(err) => err.category(),
            Self::Stream(err) => err.category(),
            Self::Io(_) => ErrorCategory::FileSystem,
            Self::Json(_) => ErrorCategory::Internal,
        }
    }
}

impl P4StreamError {
    /// Get a user-friendly error message with context and actionable suggestions.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = format!("Error: {}\n", self.user_message());

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    /// Map this error to the CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Stream(err) if err.is_validation() => ExitCode::VALIDATION,
            Self::Stream(StreamError::NotFound { .. }) => ExitCode::NOT_FOUND,
            Self::Stream(StreamError::Remote(DepotError::Runner(RunnerError::Timeout {
                ..
            }))) => ExitCode::COMMAND_TIMEOUT,
            Self::Stream(StreamError::Remote(_)) => ExitCode::REMOTE_FAILURE,
            Self::Stream(StreamError::Template(_)) | Self::Io(_) | Self::Json(_) => {
                ExitCode::INTERNAL
            }
            // is_validation() covers the remaining variants
            Self::Stream(_) => ExitCode::VALIDATION,
        }
    }
}
