//! Mutable stream description used while a creation request is assembled.

use p4stream_utils::error::StreamError;

use super::options::{DEFAULT_OPTIONS, VIRTUAL_OPTIONS, encode_options};
use super::{NO_PARENT, StreamKind, StreamSpec, validate_location};

/// A caller-supplied adjustment applied to a draft after the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOverride {
    /// Replace the options with the encoding of a five-flag vector.
    Options(Vec<u8>),
    /// Replace the owner.
    Owner(String),
    /// Replace the path mapping lines kept on the spec.
    Paths(Vec<String>),
}

/// A stream under construction.
///
/// The kind tag stays unvalidated until [`StreamDraft::finish`], so overrides
/// run (and can fail) before the kind is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDraft {
    pub location: String,
    pub owner: String,
    pub name: String,
    pub parent: String,
    pub kind_tag: String,
    pub options: String,
    pub paths: Vec<String>,
}

impl StreamDraft {
    /// Start a draft with the defaults for `kind_tag`.
    ///
    /// Mainline streams lose their parent and virtual streams start from the
    /// no-flow baseline. An unknown tag gets the plain defaults here and is
    /// rejected later.
    #[must_use]
    pub fn new(
        location: impl Into<String>,
        owner: impl Into<String>,
        name: impl Into<String>,
        parent: impl Into<String>,
        kind_tag: impl Into<String>,
    ) -> Self {
        let kind_tag = kind_tag.into();
        let kind = StreamKind::parse(&kind_tag).ok();

        let parent = if kind == Some(StreamKind::Mainline) {
            NO_PARENT.to_string()
        } else {
            parent.into()
        };
        let options = if kind == Some(StreamKind::Virtual) {
            VIRTUAL_OPTIONS
        } else {
            DEFAULT_OPTIONS
        };

        Self {
            location: location.into(),
            owner: owner.into(),
            name: name.into(),
            parent,
            kind_tag,
            options: options.to_string(),
            paths: Vec::new(),
        }
    }

    fn is_virtual(&self) -> bool {
        self.kind_tag == StreamKind::Virtual.as_str()
    }

    /// Apply one override.
    pub fn apply(&mut self, change: &StreamOverride) -> Result<(), StreamError> {
        match change {
            StreamOverride::Options(vector) => {
                self.options = encode_options(vector, self.is_virtual())?;
            }
            StreamOverride::Owner(owner) => self.owner.clone_from(owner),
            StreamOverride::Paths(paths) => self.paths.clone_from(paths),
        }
        Ok(())
    }

    /// Apply overrides in order, stopping at the first failure.
    pub fn apply_all<'a>(
        &mut self,
        overrides: impl IntoIterator<Item = &'a StreamOverride>,
    ) -> Result<(), StreamError> {
        overrides.into_iter().try_for_each(|change| self.apply(change))
    }

    /// Check the kind, then the location.
    pub fn validate(&self) -> Result<StreamKind, StreamError> {
        let kind = StreamKind::parse(&self.kind_tag)?;
        validate_location(&self.location)?;
        Ok(kind)
    }

    /// Validate the kind and location and produce the final spec.
    pub fn finish(self) -> Result<(StreamSpec, StreamKind), StreamError> {
        let kind = self.validate()?;

        let description = format!("Created by {} automatically.", self.owner);
        let spec = StreamSpec {
            path: self.location,
            owner: self.owner,
            name: self.name,
            parent: self.parent,
            kind: self.kind_tag,
            options: self.options,
            description,
            paths: self.paths,
            update: None,
            access: None,
        };
        Ok((spec, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(kind: &str, parent: &str) -> StreamDraft {
        StreamDraft::new("//Root/Dev", "alice", "Dev", parent, kind)
    }

    #[test]
    fn test_mainline_drops_parent() {
        let d = draft("mainline", "//Root/Other");
        assert_eq!(d.parent, "none");
        assert_eq!(d.options, DEFAULT_OPTIONS);
    }

    #[test]
    fn test_virtual_baseline() {
        let d = draft("virtual", "//Root/Main");
        assert_eq!(d.parent, "//Root/Main");
        assert_eq!(d.options, VIRTUAL_OPTIONS);
    }

    #[test]
    fn test_unknown_kind_keeps_defaults_until_finish() {
        let d = draft("feature", "//Root/Main");
        assert_eq!(d.options, DEFAULT_OPTIONS);
        assert!(matches!(d.finish(), Err(StreamError::InvalidKind { .. })));
    }

    #[test]
    fn test_options_override_on_virtual_is_forced() {
        let mut d = draft("virtual", "//Root/Main");
        d.apply(&StreamOverride::Options(vec![0, 0, 0, 0, 0])).unwrap();
        assert_eq!(d.options, "ownersubmit locked notoparent nofromparent mergeany");
    }

    #[test]
    fn test_overrides_apply_in_order() {
        let mut d = draft("development", "//Root/Main");
        d.apply_all(&[
            StreamOverride::Owner("bob".to_string()),
            StreamOverride::Options(vec![0, 0, 0, 0, 0]),
            StreamOverride::Options(vec![1, 1, 1, 1, 1]),
        ])
        .unwrap();
        assert_eq!(d.owner, "bob");
        assert_eq!(d.options, "allsubmit unlocked notoparent nofromparent mergedown");
    }

    #[test]
    fn test_failing_override_short_circuits() {
        let mut d = draft("development", "//Root/Main");
        let err = d
            .apply_all(&[
                StreamOverride::Options(vec![1, 1]),
                StreamOverride::Owner("bob".to_string()),
            ])
            .unwrap_err();
        assert!(matches!(err, StreamError::InvalidArity { .. }));
        assert_eq!(d.owner, "alice");
    }

    #[test]
    fn test_finish_checks_kind_before_location() {
        let d = StreamDraft::new("Root/Dev", "alice", "Dev", "none", "feature");
        assert!(matches!(d.finish(), Err(StreamError::InvalidKind { .. })));

        let d = StreamDraft::new("//Root/Dev/...", "alice", "Dev", "none", "task");
        assert!(matches!(d.finish(), Err(StreamError::InvalidLocation { .. })));
    }

    #[test]
    fn test_validate_leaves_draft_usable() {
        let d = draft("task", "//Root/Main");
        assert_eq!(d.validate().unwrap(), StreamKind::Task);
        assert!(d.finish().is_ok());
    }

    #[test]
    fn test_finish_builds_spec() {
        let (spec, kind) = draft("release", "//Root/Main").finish().unwrap();
        assert_eq!(kind, StreamKind::Release);
        assert_eq!(spec.path, "//Root/Dev");
        assert_eq!(spec.kind, "release");
        assert_eq!(spec.description, "Created by alice automatically.");
    }
}
