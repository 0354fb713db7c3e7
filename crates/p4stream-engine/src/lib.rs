//! Stream lifecycle core
//!
//! Everything that talks to the depot goes through [`CommandExecutor`]; the
//! lifecycle types never spawn processes themselves. [`P4Cli`] is the
//! production executor driving the `p4` command-line client.

pub mod create;
pub mod delete;
pub mod executor;
pub mod lifecycle;
pub mod p4cli;
pub mod records;
pub mod repository;
pub mod stream;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use create::{CreateRequest, PreparedStream, StreamCreator};
pub use delete::{DeletionPlan, StreamDestroyer};
pub use executor::CommandExecutor;
pub use lifecycle::StreamLifecycle;
pub use p4cli::{Connection, P4Cli};
pub use records::{ChangeInfo, ClientInfo, Record};
pub use repository::StreamRepository;
pub use stream::draft::{StreamDraft, StreamOverride};
pub use stream::options::{encode_options, parse_option_vector};
pub use stream::render::render_spec;
pub use stream::{NO_PARENT, StreamKind, StreamSpec, validate_location};

pub use p4stream_utils::error::{DepotError, LocationProblem, StreamError};
