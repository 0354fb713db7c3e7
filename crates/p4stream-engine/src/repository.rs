//! Read-only queries against the depot.

use tracing::debug;

use p4stream_utils::error::{DepotError, StreamError};

use crate::executor::CommandExecutor;
use crate::records::{ChangeInfo, ClientInfo, Record};
use crate::stream::{StreamSpec, recursive_pattern};

/// Stream and dependent lookups over a [`CommandExecutor`].
#[derive(Debug)]
pub struct StreamRepository<'a, E: CommandExecutor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: CommandExecutor + ?Sized> StreamRepository<'a, E> {
    #[must_use]
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Every stream on the server, in server order.
    ///
    /// Server messages are skipped. Collection stops at the first object
    /// that is not a stream.
    pub fn list_streams(&self) -> Result<Vec<StreamSpec>, StreamError> {
        let mut streams = Vec::new();
        for record in self.executor.run("streams", &[])? {
            match record {
                Record::Stream(spec) => streams.push(spec),
                Record::Message(text) => debug!(message = %text, "streams notice"),
                _ => break,
            }
        }
        Ok(streams)
    }

    /// The stored spec at `location`.
    ///
    /// Any reply that is not exactly one stream record, including the blank
    /// form the server returns for unknown paths, is [`StreamError::NotFound`].
    pub fn get_stream(&self, location: &str) -> Result<StreamSpec, StreamError> {
        let mut records = self.executor.run("stream", &["-o", location])?;
        let not_found = || StreamError::NotFound {
            location: location.to_string(),
        };

        if records.len() != 1 {
            return Err(not_found());
        }
        match records.pop() {
            Some(Record::Stream(spec)) => Ok(spec),
            _ => Err(not_found()),
        }
    }

    /// Whether a stream exists at `location`.
    pub fn stream_exists(&self, location: &str) -> Result<bool, StreamError> {
        match self.get_stream(location) {
            Ok(_) => Ok(true),
            Err(StreamError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Shelved changelists with files under `location`.
    pub fn shelved_changes(&self, location: &str) -> Result<Vec<ChangeInfo>, StreamError> {
        let pattern = recursive_pattern(location);
        let records = self.executor.run("changes", &["-s", "shelved", &pattern])?;
        typed(records, "changes", |record| match record {
            Record::Change(change) => Ok(change),
            other => Err(other),
        })
    }

    /// Workspaces bound to `location`.
    pub fn clients(&self, location: &str) -> Result<Vec<ClientInfo>, StreamError> {
        let records = self.executor.run("clients", &["-S", location])?;
        typed(records, "clients", client)
    }

    /// Unloaded workspaces bound to `location`.
    pub fn unloaded_clients(&self, location: &str) -> Result<Vec<ClientInfo>, StreamError> {
        let records = self.executor.run("clients", &["-U", "-S", location])?;
        typed(records, "clients -U", client)
    }
}

fn client(record: Record) -> Result<ClientInfo, Record> {
    match record {
        Record::Client(info) => Ok(info),
        other => Err(other),
    }
}

/// Keep records of one type, skip messages, reject anything else.
fn typed<T>(
    records: Vec<Record>,
    listing: &str,
    pick: impl Fn(Record) -> Result<T, Record>,
) -> Result<Vec<T>, StreamError> {
    let mut items = Vec::new();
    for record in records {
        match pick(record) {
            Ok(item) => items.push(item),
            Err(Record::Message(text)) => debug!(listing, message = %text, "listing notice"),
            Err(other) => {
                return Err(DepotError::Parse(format!(
                    "unexpected record in {listing} output: {other:?}"
                ))
                .into());
            }
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingExecutor;
    use serde_json::Map;

    fn stream(path: &str) -> Record {
        Record::Stream(StreamSpec {
            path: path.to_string(),
            kind: "development".to_string(),
            update: Some("2024/01/01".to_string()),
            ..StreamSpec::default()
        })
    }

    #[test]
    fn test_list_streams_empty() {
        let exec = RecordingExecutor::new("alice");
        assert!(StreamRepository::new(&exec).list_streams().unwrap().is_empty());
        assert_eq!(exec.lines(), vec!["streams"]);
    }

    #[test]
    fn test_list_streams_stops_at_first_non_stream() {
        let exec = RecordingExecutor::new("alice").with_records(
            "streams",
            vec![
                stream("//Root/Main"),
                Record::Message("notice".to_string()),
                stream("//Root/Dev"),
                Record::Untyped(Map::new()),
                stream("//Root/Late"),
            ],
        );
        let paths: Vec<_> = StreamRepository::new(&exec)
            .list_streams()
            .unwrap()
            .into_iter()
            .map(|s| s.path)
            .collect();
        assert_eq!(paths, vec!["//Root/Main", "//Root/Dev"]);
    }

    #[test]
    fn test_list_streams_propagates_failure() {
        let exec = RecordingExecutor::new("alice").failing_on("streams", "boom");
        assert!(matches!(
            StreamRepository::new(&exec).list_streams(),
            Err(StreamError::Remote(DepotError::Server { .. }))
        ));
    }

    #[test]
    fn test_get_stream() {
        let exec = RecordingExecutor::new("alice")
            .with_records("stream -o //Root/Dev", vec![stream("//Root/Dev")]);
        let spec = StreamRepository::new(&exec).get_stream("//Root/Dev").unwrap();
        assert_eq!(spec.path, "//Root/Dev");
    }

    #[test]
    fn test_get_stream_not_found_shapes() {
        let cases = vec![
            vec![],
            vec![Record::Untyped(Map::new())],
            vec![stream("//Root/Dev"), stream("//Root/Dev")],
        ];
        for records in cases {
            let exec = RecordingExecutor::new("alice").with_records("stream -o //Root/Dev", records);
            match StreamRepository::new(&exec).get_stream("//Root/Dev") {
                Err(StreamError::NotFound { location }) => assert_eq!(location, "//Root/Dev"),
                other => panic!("expected NotFound, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_not_found_message() {
        let exec = RecordingExecutor::new("alice");
        let err = StreamRepository::new(&exec).get_stream("//Root/Gone").unwrap_err();
        assert_eq!(err.to_string(), "//Root/Gone - no such stream.");
    }

    #[test]
    fn test_stream_exists() {
        let exec = RecordingExecutor::new("alice")
            .with_records("stream -o //Root/Dev", vec![stream("//Root/Dev")]);
        let repo = StreamRepository::new(&exec);
        assert!(repo.stream_exists("//Root/Dev").unwrap());
        assert!(!repo.stream_exists("//Root/Other").unwrap());
    }

    #[test]
    fn test_shelved_changes_skips_messages() {
        let exec = RecordingExecutor::new("alice").with_records(
            "changes -s shelved //Root/Dev/...",
            vec![
                Record::Change(ChangeInfo {
                    change: 42,
                    ..ChangeInfo::default()
                }),
                Record::Message("no such file(s).".to_string()),
            ],
        );
        let changes = StreamRepository::new(&exec).shelved_changes("//Root/Dev").unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change, 42);
    }

    #[test]
    fn test_clients_rejects_unexpected_records() {
        let exec = RecordingExecutor::new("alice")
            .with_records("clients -S //Root/Dev", vec![Record::Untyped(Map::new())]);
        assert!(matches!(
            StreamRepository::new(&exec).clients("//Root/Dev"),
            Err(StreamError::Remote(DepotError::Parse(_)))
        ));
    }

    #[test]
    fn test_unloaded_clients_query() {
        let exec = RecordingExecutor::new("alice");
        StreamRepository::new(&exec).unloaded_clients("//Root/Dev").unwrap();
        assert_eq!(exec.lines(), vec!["clients -U -S //Root/Dev"]);
    }
}
