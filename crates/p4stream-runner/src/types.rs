//! Types used by the runner module

use serde::{Deserialize, Serialize};

/// How stdin is wired for a spawned process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerMode {
    /// No stdin, the child sees an empty/closed stream
    Detached,
    /// A payload is piped to the child's stdin and then closed
    Piped,
}

impl RunnerMode {
    /// Convert runner mode to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Detached => "detached",
            Self::Piped => "piped",
        }
    }
}

impl std::fmt::Display for RunnerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
