//! Stream creation
//!
//! A request is turned into a [`StreamDraft`], overrides are applied, the
//! kind and location are validated, and only then is anything sent to the
//! server, including the owner lookup. Submission and the optional populate are not rolled back if a
//! later step fails.

use tracing::info;

use p4stream_utils::error::StreamError;
use p4stream_utils::logging::{lifecycle_span, log_lifecycle_complete, log_lifecycle_error};

use crate::executor::{CommandExecutor, confirmation_text};
use crate::stream::draft::{StreamDraft, StreamOverride};
use crate::stream::render::render_spec;
use crate::stream::{StreamKind, StreamSpec};

/// What the caller wants created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub location: String,
    pub name: String,
    /// Stream type tag, checked against [`StreamKind`]
    pub kind: String,
    /// Parent location; ignored for mainline streams
    pub parent: String,
    /// Copy the parent's files into the new stream after creation
    pub populate: bool,
    pub overrides: Vec<StreamOverride>,
}

impl CreateRequest {
    #[must_use]
    pub fn new(
        location: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
        parent: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            name: name.into(),
            kind: kind.into(),
            parent: parent.into(),
            populate: false,
            overrides: Vec::new(),
        }
    }

    #[must_use]
    pub fn populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }

    #[must_use]
    pub fn with_override(mut self, change: StreamOverride) -> Self {
        self.overrides.push(change);
        self
    }

    /// Shorthand for a five-flag options override.
    #[must_use]
    pub fn with_options(self, vector: Vec<u8>) -> Self {
        self.with_override(StreamOverride::Options(vector))
    }

    /// Apply the overrides and check the kind and location. No remote calls.
    pub fn validate(&self) -> Result<StreamKind, StreamError> {
        self.checked_draft().map(|(_, kind)| kind)
    }

    /// Draft with overrides applied and validated; the owner is still unset.
    fn checked_draft(&self) -> Result<(StreamDraft, StreamKind), StreamError> {
        let mut draft = StreamDraft::new(
            self.location.as_str(),
            "",
            self.name.as_str(),
            self.parent.as_str(),
            self.kind.as_str(),
        );
        draft.apply_all(&self.overrides)?;
        let kind = draft.validate()?;
        Ok((draft, kind))
    }

    fn overrides_owner(&self) -> bool {
        self.overrides
            .iter()
            .any(|change| matches!(change, StreamOverride::Owner(_)))
    }
}

/// A validated stream and its rendered document, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedStream {
    pub spec: StreamSpec,
    pub kind: StreamKind,
    pub document: String,
    /// Whether populate will run; never true for mainline or virtual streams
    pub populate: bool,
}

impl PreparedStream {
    /// Run every local step of creation for `owner`. No remote calls.
    pub fn prepare(request: &CreateRequest, owner: &str) -> Result<Self, StreamError> {
        Self::prepare_with(request, || Ok(owner.to_string()))
    }

    /// Like [`PreparedStream::prepare`], but the owner is resolved lazily.
    ///
    /// `owner` runs only after overrides and validation succeed, and not at
    /// all when an owner override is present.
    pub fn prepare_with(
        request: &CreateRequest,
        owner: impl FnOnce() -> Result<String, StreamError>,
    ) -> Result<Self, StreamError> {
        let (mut draft, _) = request.checked_draft()?;
        if !request.overrides_owner() {
            draft.owner = owner()?;
        }
        let (spec, kind) = draft.finish()?;
        let document = render_spec(&spec, kind)?;

        Ok(Self {
            populate: request.populate
                && !matches!(kind, StreamKind::Mainline | StreamKind::Virtual),
            spec,
            kind,
            document,
        })
    }
}

/// Creates streams through a [`CommandExecutor`].
#[derive(Debug)]
pub struct StreamCreator<'a, E: CommandExecutor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: CommandExecutor + ?Sized> StreamCreator<'a, E> {
    #[must_use]
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Create the stream and, when requested, populate it from its parent.
    ///
    /// Returns the server's confirmation of the submitted spec. Populate
    /// output is only logged, but a populate failure fails the call.
    pub fn create(&self, request: &CreateRequest) -> Result<String, StreamError> {
        let span = lifecycle_span("create", &request.location);
        let _enter = span.enter();

        let result = self.create_inner(request);
        match &result {
            Ok(message) => log_lifecycle_complete("create", &request.location, message),
            Err(e) => log_lifecycle_error("create", &request.location, e),
        }
        result
    }

    /// Render the document `create` would submit, without submitting it.
    pub fn preview(&self, request: &CreateRequest) -> Result<PreparedStream, StreamError> {
        PreparedStream::prepare_with(request, || Ok(self.executor.user()?))
    }

    fn create_inner(&self, request: &CreateRequest) -> Result<String, StreamError> {
        let prepared = self.preview(request)?;
        let location = prepared.spec.path.as_str();

        let out = self
            .executor
            .run_with_input(&["stream", "-i"], prepared.document.as_bytes())?;
        let message = confirmation_text(&out);
        info!(stream = location, kind = %prepared.kind, "stream spec submitted");

        if prepared.populate {
            let description = format!("Populate {location}");
            let out = self
                .executor
                .run_raw(&["populate", "-S", location, "-r", "-d", &description])?;
            info!(
                stream = location,
                output = %confirmation_text(&out),
                "stream populated from parent"
            );
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CallKind, RecordingExecutor};

    fn request(kind: &str) -> CreateRequest {
        CreateRequest::new("//Root/Dev", "Dev", kind, "//Root/Main")
    }

    #[test]
    fn test_create_submits_rendered_document() {
        let exec = RecordingExecutor::new("alice")
            .with_output("stream -i", "Stream //Root/Dev saved.\n");

        let message = StreamCreator::new(&exec).create(&request("development")).unwrap();
        assert_eq!(message, "Stream //Root/Dev saved.");

        let calls = exec.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, CallKind::Input);
        let doc = calls[0].input.as_deref().unwrap();
        assert!(doc.starts_with("Stream:  //Root/Dev\nOwner:        alice\n"));
        assert!(doc.contains("Parent:       //Root/Main\n"));
        assert!(doc.contains("Options:        allsubmit unlocked toparent fromparent mergedown\n"));
    }

    #[test]
    fn test_populate_runs_after_submit() {
        let exec = RecordingExecutor::new("alice")
            .with_output("stream -i", "Stream //Root/Dev saved.\n")
            .with_output(
                "populate -S //Root/Dev -r -d Populate //Root/Dev",
                "12 files branched (change 77).\n",
            );

        let message = StreamCreator::new(&exec)
            .create(&request("development").populate(true))
            .unwrap();
        assert_eq!(message, "Stream //Root/Dev saved.");
        assert_eq!(
            exec.lines(),
            vec!["stream -i", "populate -S //Root/Dev -r -d Populate //Root/Dev"]
        );
    }

    #[test]
    fn test_mainline_never_populates_and_has_no_parent() {
        let exec = RecordingExecutor::new("alice");
        StreamCreator::new(&exec)
            .create(&request("mainline").populate(true))
            .unwrap();

        let calls = exec.calls();
        assert_eq!(exec.lines(), vec!["stream -i"]);
        let doc = calls[0].input.as_deref().unwrap();
        assert!(doc.contains("Parent:       none\n"));
        assert!(!doc.contains("Options:"));
    }

    #[test]
    fn test_virtual_never_populates() {
        let exec = RecordingExecutor::new("alice");
        StreamCreator::new(&exec)
            .create(&request("virtual").populate(true))
            .unwrap();
        assert_eq!(exec.lines(), vec!["stream -i"]);
    }

    #[test]
    fn test_virtual_options_override_is_forced() {
        let exec = RecordingExecutor::new("alice");
        StreamCreator::new(&exec)
            .create(&request("virtual").with_options(vec![0, 0, 0, 0, 0]))
            .unwrap();

        let doc = exec.calls()[0].input.clone().unwrap();
        assert!(doc.contains("Options:        ownersubmit locked notoparent nofromparent mergeany\n"));
    }

    #[test]
    fn test_invalid_kind_makes_no_remote_call() {
        let exec = RecordingExecutor::new("alice");
        let err = StreamCreator::new(&exec).create(&request("feature")).unwrap_err();
        assert!(matches!(err, StreamError::InvalidKind { .. }));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_override_error_wins_over_kind_error() {
        let exec = RecordingExecutor::new("alice");
        let err = StreamCreator::new(&exec)
            .create(&request("feature").with_options(vec![1, 1]))
            .unwrap_err();
        assert!(matches!(err, StreamError::InvalidArity { expected: 5, actual: 2 }));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_invalid_location_makes_no_remote_call() {
        let exec = RecordingExecutor::new("alice");
        let req = CreateRequest::new("//Root/Dev/...", "Dev", "task", "//Root/Main");
        assert!(matches!(
            StreamCreator::new(&exec).create(&req),
            Err(StreamError::InvalidLocation { .. })
        ));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_populate_failure_after_submit_is_reported() {
        let exec = RecordingExecutor::new("alice").failing_on("populate", "no permission");
        let err = StreamCreator::new(&exec)
            .create(&request("release").populate(true))
            .unwrap_err();
        assert!(matches!(err, StreamError::Remote(_)));
        assert_eq!(exec.lines().len(), 2);
    }

    #[test]
    fn test_owner_lookup_waits_for_validation() {
        let exec = RecordingExecutor::anonymous();
        let err = StreamCreator::new(&exec).create(&request("feature")).unwrap_err();
        assert!(matches!(err, StreamError::InvalidKind { .. }));

        let req = CreateRequest::new("Root/Dev", "Dev", "task", "//Root/Main");
        let err = StreamCreator::new(&exec).create(&req).unwrap_err();
        assert!(matches!(err, StreamError::InvalidLocation { .. }));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_owner_override_skips_lookup() {
        let exec = RecordingExecutor::anonymous();
        let req = request("task").with_override(StreamOverride::Owner("bob".to_string()));

        let prepared = StreamCreator::new(&exec).preview(&req).unwrap();
        assert_eq!(prepared.spec.owner, "bob");
    }

    #[test]
    fn test_prepare_with_skips_owner_on_invalid_request() {
        let mut looked_up = false;
        let err = PreparedStream::prepare_with(&request("feature"), || {
            looked_up = true;
            Ok("alice".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, StreamError::InvalidKind { .. }));
        assert!(!looked_up);
    }

    #[test]
    fn test_request_validate_is_local() {
        assert_eq!(request("virtual").validate().unwrap(), StreamKind::Virtual);
        assert!(matches!(
            request("feature").with_options(vec![1]).validate(),
            Err(StreamError::InvalidArity { .. })
        ));
    }

    #[test]
    fn test_prepare_uses_owner_override() {
        let req = request("task").with_override(StreamOverride::Owner("bob".to_string()));
        let prepared = PreparedStream::prepare(&req, "alice").unwrap();
        assert_eq!(prepared.spec.owner, "bob");
        assert!(prepared.document.contains("Created by bob automatically."));
    }
}
