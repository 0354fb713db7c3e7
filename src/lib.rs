//! p4stream - stream lifecycle client for Perforce
//!
//! Creates streams from a typed request, inspects them, and deletes them
//! together with everything that depends on them (shelved changes,
//! workspaces, unloaded workspaces and optionally the stream's files).
//!
//! p4stream can be used in two ways:
//! - **CLI**: the `p4stream` binary (`list`, `show`, `create`, `delete`, `config`)
//! - **Library**: drive [`StreamLifecycle`] with [`P4Cli`] or your own
//!   [`CommandExecutor`]
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Preview the spec document without touching the server
//! p4stream create //Root/Dev --name Dev --type development --parent //Root/Main --dry-run
//!
//! # Create and populate from the parent
//! p4stream create //Root/Dev --name Dev --type development --parent //Root/Main --populate
//!
//! # See what deletion would remove, then delete
//! p4stream delete //Root/Dev --dry-run
//! p4stream delete //Root/Dev
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use p4stream::{Config, CreateRequest, P4Cli, StreamLifecycle};
//!
//! let config = Config::builder()
//!     .port("ssl:perforce:1666")
//!     .user("builder")
//!     .build()?;
//! let streams = StreamLifecycle::new(P4Cli::from_config(&config)?);
//!
//! for stream in streams.list_streams()? {
//!     println!("{} ({})", stream.path, stream.kind);
//! }
//!
//! let request = CreateRequest::new("//Root/Rel1", "Rel1", "release", "//Root/Main")
//!     .with_options(vec![0, 0, 0, 1, 1]);
//! println!("{}", streams.create_stream(&request)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Error Handling
//!
//! Lifecycle operations return [`StreamError`]. Validation failures
//! (options, kind, location) are reported before any remote call. Remote
//! failures abort the sequence and nothing already done is undone.
//! [`P4StreamError`] wraps everything at the CLI boundary and maps to
//! [`ExitCode`] values.

pub mod cli;

// Configuration
pub use p4stream_config::{CliArgs, Config, ConfigBuilder};

// Lifecycle core
pub use p4stream_engine::{
    ChangeInfo, ClientInfo, CommandExecutor, Connection, CreateRequest, DeletionPlan, P4Cli,
    PreparedStream, Record, StreamCreator, StreamDestroyer, StreamDraft, StreamKind,
    StreamLifecycle, StreamOverride, StreamRepository, StreamSpec, encode_options,
    parse_option_vector, render_spec, validate_location,
};

// Errors and exit codes
pub use p4stream_utils::error::{
    ConfigError, DepotError, ErrorCategory, LocationProblem, P4StreamError, StreamError,
    UserFriendlyError,
};
pub use p4stream_utils::exit_codes::ExitCode;

// Process execution, for custom executors
pub use p4stream_runner::{CommandSpec, NativeRunner, ProcessOutput, ProcessRunner, RunnerError};
