//! Exit code constants for the p4stream CLI.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `VALIDATION` | Invalid option vector, stream type or depot path |
//! | 4 | `NOT_FOUND` | Stream lookup returned no stream |
//! | 10 | `COMMAND_TIMEOUT` | A depot command exceeded its timeout |
//! | 70 | `REMOTE_FAILURE` | A depot command or the server failed |

/// Exit codes matching the documented exit code table.
///
/// The numeric values are part of the public API.
///
/// # Example
///
/// ```rust
/// use p4stream_utils::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::from_i32(70), ExitCode::REMOTE_FAILURE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid or missing command-line arguments or config
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Validation error - rejected before any depot command ran
    pub const VALIDATION: ExitCode = ExitCode(3);

    /// Not found - the requested stream does not exist
    pub const NOT_FOUND: ExitCode = ExitCode(4);

    /// Command timeout - a depot command exceeded the configured timeout
    pub const COMMAND_TIMEOUT: ExitCode = ExitCode(10);

    /// Remote failure - the depot client or server reported an error
    pub const REMOTE_FAILURE: ExitCode = ExitCode(70);

    /// Get the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
