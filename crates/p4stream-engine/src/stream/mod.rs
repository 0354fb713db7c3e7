//! Stream data model
//!
//! [`StreamSpec`] mirrors the fields the server reports for a stream;
//! [`StreamKind`] is the closed set of stream types a new stream may take.

pub mod draft;
pub mod options;
pub mod render;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use p4stream_utils::error::{LocationProblem, StreamError};

/// Prefix every depot path starts with.
pub const DEPOT_ROOT_PREFIX: &str = "//";

/// Trailing recursive wildcard that stream locations must not carry.
pub const RECURSIVE_WILDCARD_SUFFIX: &str = "/...";

/// Parent value for streams without a parent.
pub const NO_PARENT: &str = "none";

/// Stream type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Mainline,
    Development,
    Release,
    Virtual,
    Task,
}

impl StreamKind {
    /// Every kind, in the order shown in error messages.
    pub const ALL: [Self; 5] = [
        Self::Mainline,
        Self::Development,
        Self::Release,
        Self::Virtual,
        Self::Task,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mainline => "mainline",
            Self::Virtual => "virtual",
            Self::Development => "development",
            Self::Release => "release",
            Self::Task => "task",
        }
    }

    /// Parse a kind tag. Matching is exact: `Mainline` is not a kind.
    pub fn parse(tag: &str) -> Result<Self, StreamError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| StreamError::InvalidKind {
                kind: tag.to_string(),
                allowed: Self::ALL.iter().map(Self::as_str).collect(),
            })
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamKind {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A stream as stored on the server.
///
/// `kind` stays a string here: listings can report types (for example
/// `sparsedev`) that this crate never creates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamSpec {
    /// Depot location, e.g. `//Root/Dev`
    pub path: String,
    pub owner: String,
    pub name: String,
    /// Parent location or `none`
    pub parent: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Space-separated option tokens
    pub options: String,
    pub description: String,
    /// Path mapping lines
    pub paths: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
}

impl StreamSpec {
    /// The parsed kind, if it is one this crate knows about.
    #[must_use]
    pub fn known_kind(&self) -> Option<StreamKind> {
        StreamKind::parse(&self.kind).ok()
    }

    #[must_use]
    pub fn has_parent(&self) -> bool {
        !self.parent.is_empty() && self.parent != NO_PARENT
    }
}

/// Check the syntactic rule for a stream location.
///
/// A location must start with `//` and must not end with `/...`.
/// Nothing is checked against the server.
pub fn validate_location(location: &str) -> Result<(), StreamError> {
    let problem = if location.is_empty() {
        Some(LocationProblem::Empty)
    } else if !location.starts_with(DEPOT_ROOT_PREFIX) {
        Some(LocationProblem::MissingRootPrefix)
    } else if location.ends_with(RECURSIVE_WILDCARD_SUFFIX) {
        Some(LocationProblem::RecursiveWildcardSuffix)
    } else {
        None
    };

    match problem {
        Some(problem) => Err(StreamError::InvalidLocation {
            location: location.to_string(),
            problem,
        }),
        None => Ok(()),
    }
}

/// Pattern matching everything under `location`.
#[must_use]
pub fn recursive_pattern(location: &str) -> String {
    format!("{location}{RECURSIVE_WILDCARD_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        for kind in StreamKind::ALL {
            assert_eq!(StreamKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert_eq!("task".parse::<StreamKind>().unwrap(), StreamKind::Task);
    }

    #[test]
    fn test_parse_rejects_unknown_and_miscased() {
        for tag in ["Mainline", "feature", "", "release "] {
            match StreamKind::parse(tag) {
                Err(StreamError::InvalidKind { kind, allowed }) => {
                    assert_eq!(kind, tag);
                    assert_eq!(
                        allowed,
                        vec!["mainline", "virtual", "development", "release", "task"]
                    );
                }
                other => panic!("expected InvalidKind for {tag:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_kind_message_lists_allowed() {
        let err = StreamKind::parse("feature").unwrap_err();
        assert_eq!(
            err.to_string(),
            "stream type 'feature' should be one of the following 'mainline', 'development', 'release', 'virtual', 'task'"
        );
    }

    #[test]
    fn test_validate_location() {
        assert!(validate_location("//Root/Dev").is_ok());
        assert!(validate_location("//Root/Dev/sub").is_ok());
        // Only the trailing recursive wildcard is rejected
        assert!(validate_location("//Root/.../Dev").is_ok());

        let cases = [
            ("", LocationProblem::Empty),
            ("Root/Dev", LocationProblem::MissingRootPrefix),
            ("/Root/Dev", LocationProblem::MissingRootPrefix),
            ("//Root/Dev/...", LocationProblem::RecursiveWildcardSuffix),
        ];
        for (location, expected) in cases {
            match validate_location(location) {
                Err(StreamError::InvalidLocation { problem, .. }) => {
                    assert_eq!(problem, expected, "location {location:?}");
                }
                other => panic!("expected InvalidLocation for {location:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_has_parent() {
        let mut spec = StreamSpec {
            parent: NO_PARENT.to_string(),
            ..StreamSpec::default()
        };
        assert!(!spec.has_parent());
        spec.parent = "//Root/Main".to_string();
        assert!(spec.has_parent());
    }

    #[test]
    fn test_known_kind() {
        let mut spec = StreamSpec {
            kind: "release".to_string(),
            ..StreamSpec::default()
        };
        assert_eq!(spec.known_kind(), Some(StreamKind::Release));
        spec.kind = "sparsedev".to_string();
        assert_eq!(spec.known_kind(), None);
    }

    #[test]
    fn test_spec_serializes_kind_as_type() {
        let spec = StreamSpec {
            path: "//Root/Main".to_string(),
            kind: "mainline".to_string(),
            ..StreamSpec::default()
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "mainline");
        assert!(json.get("update").is_none());
    }
}
