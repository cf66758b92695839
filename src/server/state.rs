use std::sync::Arc;

use crate::handler::UserHandler;
use crate::pipeline::Pipeline;
use crate::service::UserService;
use crate::storage::{InMemoryUserRepository, UserRepository};

/// Shared per-process state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<UserHandler>,
    pub pipeline: Arc<Pipeline>,
    pub describe_enabled: bool,
}

impl AppState {
    pub fn new(handler: Arc<UserHandler>, pipeline: Pipeline) -> Self {
        Self {
            handler,
            pipeline: Arc::new(pipeline),
            describe_enabled: false,
        }
    }

    /// Wires repository -> service -> handler behind the standard pipeline.
    pub fn from_repository(repository: Arc<dyn UserRepository>) -> Self {
        let service = Arc::new(UserService::new(repository));
        let handler = Arc::new(UserHandler::new(service));
        Self::new(handler, Pipeline::standard())
    }

    pub fn in_memory() -> Self {
        Self::from_repository(Arc::new(InMemoryUserRepository::new()))
    }

    /// Serve the `GET /` method listing.
    pub fn describe(mut self, enabled: bool) -> Self {
        self.describe_enabled = enabled;
        self
    }
}
