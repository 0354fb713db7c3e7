//! Scripted [`CommandExecutor`] for tests.
//!
//! Every call is recorded as a single line (`changes -s shelved //R/D/...`)
//! so tests can assert on the exact remote call sequence.

use std::cell::RefCell;
use std::collections::HashMap;

use p4stream_utils::error::DepotError;

use crate::executor::CommandExecutor;
use crate::records::Record;

/// How a call reached the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Records,
    Raw,
    Input,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub kind: CallKind,
    pub line: String,
    pub input: Option<String>,
}

/// In-memory executor with scripted responses.
///
/// Unscripted record calls return no records; unscripted raw calls return
/// empty output. Failures match on a prefix of the call line.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    user: Option<String>,
    records: HashMap<String, Vec<Record>>,
    outputs: HashMap<String, String>,
    failures: Vec<(String, String)>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingExecutor {
    #[must_use]
    pub fn new(user: &str) -> Self {
        Self {
            user: Some(user.to_string()),
            ..Self::default()
        }
    }

    /// Executor whose `user()` call fails.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Records returned for the exact call line.
    #[must_use]
    pub fn with_records(mut self, line: &str, records: Vec<Record>) -> Self {
        self.records.insert(line.to_string(), records);
        self
    }

    /// Raw output returned for the exact call line.
    #[must_use]
    pub fn with_output(mut self, line: &str, output: &str) -> Self {
        self.outputs.insert(line.to_string(), output.to_string());
        self
    }

    /// Fail every call whose line starts with `prefix`.
    #[must_use]
    pub fn failing_on(mut self, prefix: &str, message: &str) -> Self {
        self.failures.push((prefix.to_string(), message.to_string()));
        self
    }

    /// Call lines in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.line.clone()).collect()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, kind: CallKind, line: String, input: Option<&[u8]>) -> Result<String, DepotError> {
        self.calls.borrow_mut().push(Call {
            kind,
            line: line.clone(),
            input: input.map(|bytes| String::from_utf8_lossy(bytes).to_string()),
        });

        match self.failures.iter().find(|(prefix, _)| line.starts_with(prefix.as_str())) {
            Some((_, message)) => Err(DepotError::Server {
                message: message.clone(),
            }),
            None => Ok(line),
        }
    }
}

impl CommandExecutor for RecordingExecutor {
    fn user(&self) -> Result<String, DepotError> {
        self.user
            .clone()
            .ok_or_else(|| DepotError::Parse("no user configured".to_string()))
    }

    fn run(&self, command: &str, args: &[&str]) -> Result<Vec<Record>, DepotError> {
        let mut parts = vec![command];
        parts.extend_from_slice(args);
        let line = self.record(CallKind::Records, parts.join(" "), None)?;
        Ok(self.records.get(&line).cloned().unwrap_or_default())
    }

    fn run_raw(&self, args: &[&str]) -> Result<Vec<u8>, DepotError> {
        let line = self.record(CallKind::Raw, args.join(" "), None)?;
        Ok(self.outputs.get(&line).cloned().unwrap_or_default().into_bytes())
    }

    fn run_with_input(&self, args: &[&str], input: &[u8]) -> Result<Vec<u8>, DepotError> {
        let line = self.record(CallKind::Input, args.join(" "), Some(input))?;
        Ok(self.outputs.get(&line).cloned().unwrap_or_default().into_bytes())
    }
}
