//! Cascading stream deletion
//!
//! A stream spec cannot be deleted while shelved changes or workspaces still
//! refer to it. Deletion removes those dependents first, in a fixed order,
//! and aborts at the first failure. Nothing already removed is restored.
//!
//! Order:
//! 1. shelved changes under `location/...`
//! 2. workspaces bound to the stream
//! 3. unloaded workspaces bound to the stream
//! 4. the stream's files, when pruning
//! 5. the stream spec

use serde::Serialize;
use tracing::info;

use p4stream_utils::error::StreamError;
use p4stream_utils::logging::{lifecycle_span, log_lifecycle_complete, log_lifecycle_error};

use crate::executor::{CommandExecutor, confirmation_text};
use crate::repository::StreamRepository;
use crate::stream::{recursive_pattern, validate_location};

/// Dependents that deleting a stream would remove.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionPlan {
    pub location: String,
    pub shelved_changes: Vec<u64>,
    pub clients: Vec<String>,
    pub unloaded_clients: Vec<String>,
    pub prune: bool,
}

impl DeletionPlan {
    /// The depot commands deletion would issue, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        let pattern = recursive_pattern(&self.location);
        let mut commands: Vec<String> = self
            .shelved_changes
            .iter()
            .map(|change| format!("p4 shelve -d -f -c {change} {pattern}"))
            .collect();
        commands.extend(
            self.clients
                .iter()
                .chain(&self.unloaded_clients)
                .map(|client| format!("p4 client -d -f {client}")),
        );
        if self.prune {
            commands.push(format!("p4 obliterate -y {pattern}"));
        }
        commands.push(format!("p4 stream -d {}", self.location));
        commands
    }
}

/// Deletes streams and their dependents through a [`CommandExecutor`].
#[derive(Debug)]
pub struct StreamDestroyer<'a, E: CommandExecutor + ?Sized> {
    executor: &'a E,
}

impl<'a, E: CommandExecutor + ?Sized> StreamDestroyer<'a, E> {
    #[must_use]
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Delete the stream at `location` after removing its dependents.
    ///
    /// With `prune`, the stream's files are obliterated before the spec is
    /// deleted. Returns the server's confirmation of the spec deletion.
    pub fn delete(&self, location: &str, prune: bool) -> Result<String, StreamError> {
        let span = lifecycle_span("delete", location);
        let _enter = span.enter();

        let result = self.delete_inner(location, prune);
        match &result {
            Ok(message) => log_lifecycle_complete("delete", location, message),
            Err(e) => log_lifecycle_error("delete", location, e),
        }
        result
    }

    /// Enumerate what [`delete`](Self::delete) would remove. Read-only.
    pub fn plan(&self, location: &str, prune: bool) -> Result<DeletionPlan, StreamError> {
        validate_location(location)?;
        let repo = StreamRepository::new(self.executor);

        Ok(DeletionPlan {
            location: location.to_string(),
            shelved_changes: repo
                .shelved_changes(location)?
                .into_iter()
                .map(|c| c.change)
                .collect(),
            clients: repo.clients(location)?.into_iter().map(|c| c.client).collect(),
            unloaded_clients: repo
                .unloaded_clients(location)?
                .into_iter()
                .map(|c| c.client)
                .collect(),
            prune,
        })
    }

    fn delete_inner(&self, location: &str, prune: bool) -> Result<String, StreamError> {
        validate_location(location)?;
        let repo = StreamRepository::new(self.executor);
        let pattern = recursive_pattern(location);

        // Each listing is taken right before its deletions run.
        for change in repo.shelved_changes(location)? {
            let id = change.change.to_string();
            self.executor
                .run_raw(&["shelve", "-d", "-f", "-c", &id, &pattern])?;
            info!(change = change.change, "deleted shelved change");
        }

        for client in repo.clients(location)? {
            self.delete_client(&client.client)?;
        }

        for client in repo.unloaded_clients(location)? {
            self.delete_client(&client.client)?;
        }

        if prune {
            self.executor.run_raw(&["obliterate", "-y", &pattern])?;
            info!(stream = location, "obliterated stream files");
        }

        let out = self.executor.run_raw(&["stream", "-d", location])?;
        Ok(confirmation_text(&out))
    }

    fn delete_client(&self, name: &str) -> Result<(), StreamError> {
        self.executor.run_raw(&["client", "-d", "-f", name])?;
        info!(client = name, "deleted workspace");
        Ok(())
    }
}
