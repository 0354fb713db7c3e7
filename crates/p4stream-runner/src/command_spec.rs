use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::types::RunnerMode;

// ============================================================================
// CommandSpec - argv-style process description
// ============================================================================

/// Specification for a command to execute.
///
/// All process execution goes through this type to ensure argv-style invocation.
/// Arguments are stored as discrete `OsString` elements and never joined into
/// a shell string, so a depot path such as `//Root/Main` or a client name
/// containing shell metacharacters reaches the child verbatim.
///
/// A command may carry a stdin payload. The runner pipes it to the child and
/// closes the stream afterwards; this is how spec documents are submitted
/// (`p4 stream -i`).
///
/// # Example
///
/// ```rust
/// use p4stream_runner::CommandSpec;
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("p4")
///     .args(["-ztag", "-Mj", "streams"])
///     .cwd("/path/to/workspace");
///
/// assert_eq!(cmd.program, OsString::from("p4"));
/// assert_eq!(cmd.args.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    /// The program to execute
    pub program: OsString,
    /// Arguments as discrete elements (NOT shell strings)
    pub args: Vec<OsString>,
    /// Optional working directory
    pub cwd: Option<PathBuf>,
    /// Optional environment overrides
    pub env: Option<HashMap<OsString, OsString>>,
    /// Optional payload written to the child's stdin
    pub stdin: Option<Vec<u8>>,
}

impl CommandSpec {
    /// Create a new `CommandSpec` with the given program.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Add a single argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments to the command.
    ///
    /// # Example
    ///
    /// ```rust
    /// use p4stream_runner::CommandSpec;
    ///
    /// let cmd = CommandSpec::new("p4")
    ///     .args(["stream", "-d", "//Root/Dev"]);
    /// assert_eq!(cmd.args.len(), 3);
    /// ```
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the command.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set an environment variable for the command.
    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach a payload that is piped to the child's stdin.
    ///
    /// # Example
    ///
    /// ```rust
    /// use p4stream_runner::{CommandSpec, RunnerMode};
    ///
    /// let cmd = CommandSpec::new("p4")
    ///     .args(["stream", "-i"])
    ///     .stdin(b"Stream: //Root/Main\n".to_vec());
    /// assert_eq!(cmd.mode(), RunnerMode::Piped);
    /// ```
    #[must_use]
    pub fn stdin(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(payload.into());
        self
    }

    /// Whether this command pipes a payload to stdin.
    #[must_use]
    pub fn mode(&self) -> RunnerMode {
        if self.stdin.is_some() {
            RunnerMode::Piped
        } else {
            RunnerMode::Detached
        }
    }

    /// Arguments rendered for log output, lossy and space separated.
    ///
    /// Only for diagnostics; never fed back into a process.
    #[must_use]
    pub fn display_args(&self) -> String {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Convert this `CommandSpec` into a `std::process::Command`.
    ///
    /// Stdio wiring is left to the runner.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        if let Some(ref env) = self.env {
            for (key, value) in env {
                cmd.env(key, value);
            }
        }

        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_new() {
        let cmd = CommandSpec::new("p4");
        assert_eq!(cmd.program, OsString::from("p4"));
        assert!(cmd.args.is_empty());
        assert!(cmd.cwd.is_none());
        assert!(cmd.env.is_none());
        assert!(cmd.stdin.is_none());
        assert_eq!(cmd.mode(), RunnerMode::Detached);
    }

    #[test]
    fn test_command_spec_builder_chain() {
        let cmd = CommandSpec::new("p4")
            .arg("-ztag")
            .args(["-Mj", "clients", "-S", "//Root/Dev"])
            .cwd("/workspace")
            .env("P4CONFIG", ".p4config");

        assert_eq!(cmd.args.len(), 5);
        assert_eq!(cmd.args[4], OsString::from("//Root/Dev"));
        assert_eq!(cmd.cwd, Some(PathBuf::from("/workspace")));
        assert_eq!(cmd.env.as_ref().map(HashMap::len), Some(1));
    }

    #[test]
    fn test_command_spec_stdin_switches_mode() {
        let cmd = CommandSpec::new("p4")
            .args(["stream", "-i"])
            .stdin("Stream: //Root/Main\n");
        assert_eq!(cmd.mode(), RunnerMode::Piped);
        assert_eq!(cmd.stdin.as_deref(), Some(&b"Stream: //Root/Main\n"[..]));
    }

    #[test]
    fn test_display_args_joins_with_spaces() {
        let cmd = CommandSpec::new("p4").args(["shelve", "-d", "-c", "42", "//Root/Dev/..."]);
        assert_eq!(cmd.display_args(), "shelve -d -c 42 //Root/Dev/...");
    }

    #[test]
    fn test_command_spec_shell_metacharacters_preserved() {
        // Client names come from the server and are passed through untouched
        let cmd = CommandSpec::new("p4")
            .args(["client", "-d", "-f"])
            .arg("ws;rm -rf /")
            .arg("$(whoami)");

        assert_eq!(cmd.args[3], OsString::from("ws;rm -rf /"));
        assert_eq!(cmd.args[4], OsString::from("$(whoami)"));
    }
}
