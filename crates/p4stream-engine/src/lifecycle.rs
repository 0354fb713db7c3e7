//! Owned entry point bundling the repository, creator and destroyer.

use p4stream_utils::error::StreamError;

use crate::create::{CreateRequest, PreparedStream, StreamCreator};
use crate::delete::{DeletionPlan, StreamDestroyer};
use crate::executor::CommandExecutor;
use crate::repository::StreamRepository;
use crate::stream::StreamSpec;

/// Stream lifecycle operations over one executor.
///
/// # Example
///
/// ```rust,no_run
/// use p4stream_config::Config;
/// use p4stream_engine::{CreateRequest, P4Cli, StreamLifecycle};
///
/// let config = Config::builder().user("builder").build()?;
/// let streams = StreamLifecycle::new(P4Cli::from_config(&config)?);
///
/// let request = CreateRequest::new("//Root/Dev", "Dev", "development", "//Root/Main")
///     .populate(true);
/// println!("{}", streams.create_stream(&request)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct StreamLifecycle<E: CommandExecutor> {
    executor: E,
}

impl<E: CommandExecutor> StreamLifecycle<E> {
    #[must_use]
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    #[must_use]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn list_streams(&self) -> Result<Vec<StreamSpec>, StreamError> {
        StreamRepository::new(&self.executor).list_streams()
    }

    pub fn get_stream(&self, location: &str) -> Result<StreamSpec, StreamError> {
        StreamRepository::new(&self.executor).get_stream(location)
    }

    pub fn create_stream(&self, request: &CreateRequest) -> Result<String, StreamError> {
        StreamCreator::new(&self.executor).create(request)
    }

    pub fn preview_stream(&self, request: &CreateRequest) -> Result<PreparedStream, StreamError> {
        StreamCreator::new(&self.executor).preview(request)
    }

    pub fn delete_stream(&self, location: &str, prune: bool) -> Result<String, StreamError> {
        StreamDestroyer::new(&self.executor).delete(location, prune)
    }

    pub fn plan_deletion(&self, location: &str, prune: bool) -> Result<DeletionPlan, StreamError> {
        StreamDestroyer::new(&self.executor).plan(location, prune)
    }
}
