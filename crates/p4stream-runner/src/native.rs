use crate::error::RunnerError;
use std::io::Write;
use std::process::Stdio;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CommandSpec, ProcessOutput, ProcessRunner};

// ============================================================================
// NativeRunner - Native Process Execution
// ============================================================================

/// Native process runner using `std::process::Command`.
///
/// `NativeRunner` is the production implementation of [`ProcessRunner`].
/// It spawns the program with argv-style APIs only, pipes the optional stdin
/// payload, captures stdout and stderr, and kills the child when the timeout
/// elapses.
///
/// # Example
///
/// ```rust,no_run
/// use p4stream_runner::{CommandSpec, NativeRunner, ProcessRunner};
/// use std::time::Duration;
///
/// let runner = NativeRunner::new();
/// let cmd = CommandSpec::new("p4").args(["-ztag", "-Mj", "streams"]);
///
/// let output = runner.run(&cmd, Duration::from_secs(30)).unwrap();
/// println!("{}", output.stdout_string());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner;

impl NativeRunner {
    /// Create a new `NativeRunner`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for NativeRunner {
    fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError> {
        use std::sync::mpsc;
        use std::thread;

        let mut command = cmd.to_command();
        command
            .stdin(if cmd.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(
            program = %cmd.program.to_string_lossy(),
            args = %cmd.display_args(),
            mode = %cmd.mode(),
            "Spawning process"
        );

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RunnerError::ProgramNotFound {
                    program: cmd.program.to_string_lossy().into_owned(),
                }
            } else {
                RunnerError::NativeExecutionFailed {
                    reason: format!(
                        "Failed to spawn process '{}': {}",
                        cmd.program.to_string_lossy(),
                        e
                    ),
                }
            }
        })?;

        // Feed stdin from its own thread so a child that fills its stdout
        // pipe before draining stdin cannot deadlock us.
        let writer = match (child.stdin.take(), cmd.stdin.clone()) {
            (Some(mut pipe), Some(payload)) => Some(thread::spawn(move || {
                let result = pipe.write_all(&payload);
                drop(pipe);
                result
            })),
            _ => None,
        };

        let child_id = child.id();
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let output = child.wait_with_output();
            let _ = tx.send(output);
        });

        match rx.recv_timeout(timeout) {
            Ok(output_result) => {
                let _ = handle.join();

                let output = output_result.map_err(|e| RunnerError::NativeExecutionFailed {
                    reason: format!("Failed to wait for process: {e}"),
                })?;

                if let Some(writer) = writer {
                    match writer.join() {
                        Ok(Ok(())) => {}
                        // The child closed stdin early; its own output explains why
                        Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                            warn!("Process closed stdin before the payload was written");
                        }
                        Ok(Err(e)) => {
                            return Err(RunnerError::StdinWriteFailed {
                                reason: e.to_string(),
                            });
                        }
                        Err(_) => {
                            return Err(RunnerError::StdinWriteFailed {
                                reason: "stdin writer thread panicked".to_string(),
                            });
                        }
                    }
                }

                Ok(ProcessOutput::new(
                    output.stdout,
                    output.stderr,
                    output.status.code(),
                    false,
                ))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Self::terminate_process(child_id);
                let _ = handle.join();
                if let Some(writer) = writer {
                    let _ = writer.join();
                }

                Err(RunnerError::Timeout {
                    timeout_seconds: timeout.as_secs(),
                })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(RunnerError::NativeExecutionFailed {
                reason: "Process monitoring thread terminated unexpectedly".to_string(),
            }),
        }
    }
}

impl NativeRunner {
    /// Terminate a process by its PID.
    ///
    /// On Unix, sends SIGKILL to the process.
    /// On Windows, uses TerminateProcess.
    fn terminate_process(pid: u32) {
        #[cfg(unix)]
        {
            unsafe {
                libc::kill(pid as i32, libc::SIGKILL);
            }
        }

        #[cfg(windows)]
        {
            use windows::Win32::Foundation::CloseHandle;
            use windows::Win32::System::Threading::{
                OpenProcess, PROCESS_TERMINATE, TerminateProcess,
            };

            unsafe {
                if let Ok(handle) = OpenProcess(PROCESS_TERMINATE, false, pid) {
                    let _ = TerminateProcess(handle, 1);
                    let _ = CloseHandle(handle);
                }
            }
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = pid;
        }
    }
}
