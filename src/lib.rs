// ============================================================================
// memusers Library
// ============================================================================

pub mod config;
pub mod core;
pub mod handler;
pub mod logging;
pub mod pipeline;
pub mod server;
pub mod service;
pub mod status;
pub mod storage;
pub mod validation;

// Re-export main types for convenience
pub use crate::core::{DomainError, ErrorKind, User, UserId};
pub use config::{AppConfig, Cli};
pub use handler::UserHandler;
pub use pipeline::{
    CallInfo, Interceptor, LoggingInterceptor, Next, Pipeline, RecoveryInterceptor, Reply,
};
pub use server::{AppState, UserServer, build_router};
pub use service::UserService;
pub use status::{Code, Status};
pub use storage::{InMemoryUserRepository, StoreError, UserRepository};
