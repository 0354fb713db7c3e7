//! Production executor driving the `p4` command-line client.

use std::time::Duration;

use tracing::{debug, warn};

use p4stream_config::Config;
use p4stream_runner::{CommandSpec, NativeRunner, ProcessOutput, ProcessRunner, RunnerError};
use p4stream_utils::error::DepotError;

use crate::executor::CommandExecutor;
use crate::records::Record;

/// Connection flags passed ahead of every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    pub port: Option<String>,
    pub user: Option<String>,
    pub client: Option<String>,
}

impl Connection {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            port: config.port().map(str::to_string),
            user: config.user().map(str::to_string),
            client: config.client().map(str::to_string),
        }
    }

    fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (flag, value) in [("-p", &self.port), ("-u", &self.user), ("-c", &self.client)] {
            if let Some(value) = value {
                args.push(flag.to_string());
                args.push(value.clone());
            }
        }
        args
    }
}

/// [`CommandExecutor`] backed by the `p4` binary.
///
/// Unset connection values are left to p4's own resolution (P4CONFIG files,
/// `p4 set`, the environment).
#[derive(Debug, Clone)]
pub struct P4Cli<R: ProcessRunner = NativeRunner> {
    runner: R,
    program: String,
    connection: Connection,
    timeout: Duration,
}

impl P4Cli<NativeRunner> {
    /// Build an executor from resolved configuration.
    ///
    /// Fails with [`DepotError::NotInstalled`] when the configured binary
    /// cannot be found.
    pub fn from_config(config: &Config) -> Result<Self, DepotError> {
        let program = which::which(config.p4_bin()).map_err(|e| {
            debug!(program = config.p4_bin(), error = %e, "p4 binary lookup failed");
            DepotError::NotInstalled {
                program: config.p4_bin().to_string(),
            }
        })?;

        Ok(Self::with_runner(
            NativeRunner::new(),
            program.to_string_lossy(),
            Connection::from_config(config),
            config.command_timeout(),
        ))
    }
}

impl<R: ProcessRunner> P4Cli<R> {
    #[must_use]
    pub fn with_runner(
        runner: R,
        program: impl Into<String>,
        connection: Connection,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            program: program.into(),
            connection,
            timeout,
        }
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn command(&self, tagged: bool, args: &[&str]) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.program).args(self.connection.global_args());
        if tagged {
            cmd = cmd.args(["-ztag", "-Mj"]);
        }
        cmd.args(args.iter().copied())
    }

    fn execute(&self, cmd: &CommandSpec) -> Result<ProcessOutput, DepotError> {
        self.runner.run(cmd, self.timeout).map_err(|e| match e {
            RunnerError::ProgramNotFound { program } => DepotError::NotInstalled { program },
            other => DepotError::Runner(other),
        })
    }

    /// Raw stdout of a successful run; otherwise the best available message.
    fn expect_success(args: &[&str], output: ProcessOutput) -> Result<Vec<u8>, DepotError> {
        if output.success() {
            return Ok(output.stdout);
        }

        let stderr = output.stderr_string();
        let message = if !stderr.trim().is_empty() {
            stderr.trim().to_string()
        } else if !output.stdout.is_empty() {
            output.stdout_string().trim().to_string()
        } else {
            match output.exit_code {
                Some(code) => format!("exit code {code}"),
                None => "terminated by signal".to_string(),
            }
        };
        Err(DepotError::CommandFailed {
            args: args.join(" "),
            message,
        })
    }
}

impl<R: ProcessRunner> CommandExecutor for P4Cli<R> {
    fn user(&self) -> Result<String, DepotError> {
        if let Some(user) = &self.connection.user {
            return Ok(user.clone());
        }

        self.run("info", &[])?
            .into_iter()
            .find_map(|record| match record {
                Record::Untyped(object) => object
                    .get("userName")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                _ => None,
            })
            .ok_or_else(|| DepotError::Parse("p4 info did not report a user name".to_string()))
    }

    fn run(&self, command: &str, args: &[&str]) -> Result<Vec<Record>, DepotError> {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(command);
        argv.extend_from_slice(args);

        let output = self.execute(&self.command(true, &argv))?;
        let stdout = output.stdout_string();

        // Tagged errors are written to stdout, so parse before looking at
        // the exit status.
        let records = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| Record::from_json_line(command, line));

        let mut parsed = Vec::new();
        for record in records {
            match record {
                Ok(record) => parsed.push(record),
                Err(DepotError::Parse(reason)) if !output.success() => {
                    warn!(command, reason = %reason, "unparsed output from failed command");
                }
                Err(e) => return Err(e),
            }
        }

        if !output.success() {
            Self::expect_success(&argv, output)?;
        }
        debug!(command, records = parsed.len(), "depot command completed");
        Ok(parsed)
    }

    fn run_raw(&self, args: &[&str]) -> Result<Vec<u8>, DepotError> {
        let output = self.execute(&self.command(false, args))?;
        Self::expect_success(args, output)
    }

    fn run_with_input(&self, args: &[&str], input: &[u8]) -> Result<Vec<u8>, DepotError> {
        let cmd = self.command(false, args).stdin(input.to_vec());
        let output = self.execute(&cmd)?;
        Self::expect_success(args, output)
    }
}
