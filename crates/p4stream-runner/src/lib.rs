//! Runner abstraction for invoking the depot command-line client
//!
//! Provides a synchronous [`ProcessRunner`] trait and a [`NativeRunner`]
//! implementation with timeout handling and optional stdin payloads.
//!
//! # Security Model
//!
//! All process execution goes through [`CommandSpec`] to ensure argv-style invocation.
//! Depot paths, client names and changelist ids are passed as discrete
//! elements rather than shell strings.

pub mod command_spec;
pub mod error;
pub mod native;
pub mod process;
pub mod types;

pub use command_spec::CommandSpec;
pub use error::RunnerError;
pub use native::NativeRunner;
pub use process::{ProcessOutput, ProcessRunner};
pub use types::RunnerMode;
