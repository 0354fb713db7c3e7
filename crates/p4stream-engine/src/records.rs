//! Typed records parsed from tagged JSON output (`p4 -ztag -Mj`).
//!
//! Each output line is one JSON object with string values. Which record type
//! an object becomes depends on the command that produced it; objects that
//! do not have the expected shape come back as [`Record::Untyped`].

use serde::Serialize;
use serde_json::{Map, Value};

use p4stream_utils::error::DepotError;

use crate::stream::StreamSpec;

/// Server message severities at or above this are failures.
const SEVERITY_FAILED: u64 = 3;

/// A shelved (or other) changelist from `p4 changes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeInfo {
    pub change: u64,
    pub user: String,
    pub client: String,
    pub status: String,
    pub description: String,
}

/// A workspace from `p4 clients`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    pub client: String,
    pub owner: String,
    pub stream: Option<String>,
    pub root: Option<String>,
}

/// One parsed output object.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Stream(StreamSpec),
    Change(ChangeInfo),
    Client(ClientInfo),
    /// Informational or warning text from the server
    Message(String),
    Untyped(Map<String, Value>),
}

impl Record {
    /// Classify one object produced by `command`.
    ///
    /// Server error objects become `Err`; warnings and info become
    /// [`Record::Message`].
    pub fn classify(command: &str, object: Map<String, Value>) -> Result<Self, DepotError> {
        if let Some(message) = server_message(&object) {
            return match message {
                ServerMessage::Failure(text) => Err(DepotError::Server { message: text }),
                ServerMessage::Notice(text) => Ok(Self::Message(text)),
            };
        }

        let record = match command {
            "streams" | "stream" => stream_from(&object).map(Self::Stream),
            "changes" => change_from(&object).map(Self::Change),
            "clients" => client_from(&object).map(Self::Client),
            _ => None,
        };
        Ok(record.unwrap_or(Self::Untyped(object)))
    }

    /// Parse one line of tagged JSON output.
    pub fn from_json_line(command: &str, line: &str) -> Result<Self, DepotError> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| DepotError::Parse(format!("{e}: {line}")))?;
        match value {
            Value::Object(object) => Self::classify(command, object),
            other => Err(DepotError::Parse(format!("expected a JSON object, got {other}"))),
        }
    }
}

enum ServerMessage {
    Failure(String),
    Notice(String),
}

/// Messages carry `data` plus a `severity` or `level`, and nothing else that
/// identifies a form.
fn server_message(object: &Map<String, Value>) -> Option<ServerMessage> {
    let data = object.get("data")?.as_str()?.trim().to_string();
    let severity = object.get("severity").or_else(|| object.get("level"))?;
    let severity = match severity {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.parse().ok()?,
        _ => return None,
    };

    Some(if severity >= SEVERITY_FAILED {
        ServerMessage::Failure(data)
    } else {
        ServerMessage::Notice(data)
    })
}

fn text(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.trim_end().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbered fields (`Paths0`, `Paths1`, ...) until the first gap.
fn numbered(object: &Map<String, Value>, prefix: &str) -> Vec<String> {
    (0..)
        .map_while(|i| text(object, &format!("{prefix}{i}")))
        .collect()
}

/// A stored stream always reports `Update`; the blank form that
/// `stream -o` returns for an unknown path does not.
fn stream_from(object: &Map<String, Value>) -> Option<StreamSpec> {
    let update = text(object, "Update")?;
    Some(StreamSpec {
        path: text(object, "Stream")?,
        kind: text(object, "Type")?,
        owner: text(object, "Owner").unwrap_or_default(),
        name: text(object, "Name").unwrap_or_default(),
        parent: text(object, "Parent").unwrap_or_default(),
        options: text(object, "Options").unwrap_or_default(),
        description: text(object, "Description").unwrap_or_default(),
        paths: numbered(object, "Paths"),
        update: Some(update),
        access: text(object, "Access"),
    })
}

fn change_from(object: &Map<String, Value>) -> Option<ChangeInfo> {
    Some(ChangeInfo {
        change: text(object, "change")?.parse().ok()?,
        user: text(object, "user").unwrap_or_default(),
        client: text(object, "client").unwrap_or_default(),
        status: text(object, "status").unwrap_or_default(),
        description: text(object, "desc").unwrap_or_default(),
    })
}

fn client_from(object: &Map<String, Value>) -> Option<ClientInfo> {
    Some(ClientInfo {
        client: text(object, "client")?,
        owner: text(object, "Owner").unwrap_or_default(),
        stream: text(object, "Stream"),
        root: text(object, "Root"),
    })
}
