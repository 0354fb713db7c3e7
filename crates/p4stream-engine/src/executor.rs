use p4stream_utils::error::DepotError;

use crate::records::Record;

/// The command-execution boundary.
///
/// The lifecycle core builds arguments and interprets results; everything
/// about reaching the server (process spawning, connection flags, output
/// parsing, timeouts) lives behind this trait.
///
/// Calls are synchronous and block until the server answers.
pub trait CommandExecutor {
    /// User that owns specs created through this executor.
    fn user(&self) -> Result<String, DepotError>;

    /// Run `command args...` and parse the output into typed records.
    ///
    /// Informational server messages come back as [`Record::Message`];
    /// server-side errors come back as `Err`.
    fn run(&self, command: &str, args: &[&str]) -> Result<Vec<Record>, DepotError>;

    /// Run a command and return its raw stdout.
    fn run_raw(&self, args: &[&str]) -> Result<Vec<u8>, DepotError>;

    /// Run a command with `input` piped to stdin and return its raw stdout.
    fn run_with_input(&self, args: &[&str], input: &[u8]) -> Result<Vec<u8>, DepotError>;
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for &E {
    fn user(&self) -> Result<String, DepotError> {
        (**self).user()
    }

    fn run(&self, command: &str, args: &[&str]) -> Result<Vec<Record>, DepotError> {
        (**self).run(command, args)
    }

    fn run_raw(&self, args: &[&str]) -> Result<Vec<u8>, DepotError> {
        (**self).run_raw(args)
    }

    fn run_with_input(&self, args: &[&str], input: &[u8]) -> Result<Vec<u8>, DepotError> {
        (**self).run_with_input(args, input)
    }
}

/// Trimmed, lossy text of a confirmation reply.
pub(crate) fn confirmation_text(out: &[u8]) -> String {
    String::from_utf8_lossy(out).trim().to_string()
}
