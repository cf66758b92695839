//! Interceptor chain wrapped around every inbound call.
//!
//! A call is described by a [`CallInfo`] and executed as a future yielding
//! `Result<Reply, Status>`. [`Pipeline::dispatch`] threads that future through
//! the registered interceptors in order, the first one being outermost:
//!
//! ```text
//! Recovery -> Logging -> handler
//! ```
//!
//! Each interceptor receives a [`Next`] and decides when (and whether) to run
//! the rest of the chain.

pub mod logging;
pub mod recovery;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::core::User;
use crate::status::Status;

pub use logging::LoggingInterceptor;
pub use recovery::RecoveryInterceptor;

/// Successful outcome of a call, before transport encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    User(User),
    Users(Vec<User>),
    Empty,
}

pub type CallResult = Result<Reply, Status>;

/// Metadata about one inbound call.
#[derive(Debug, Clone)]
pub struct CallInfo {
    method: &'static str,
    call_id: Uuid,
    payload: String,
}

impl CallInfo {
    /// `payload` is rendered once, up front, for logging.
    pub fn new(method: &'static str, call_id: Uuid, payload: &dyn fmt::Debug) -> Self {
        Self {
            method,
            call_id,
            payload: format!("{payload:?}"),
        }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn call_id(&self) -> Uuid {
        self.call_id
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn intercept<'a>(&'a self, call: &'a CallInfo, next: Next<'a>) -> CallResult;
}

/// The remainder of the chain, ending in the handler future.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Interceptor>],
    call: &'a CallInfo,
    handler: BoxFuture<'a, CallResult>,
}

impl<'a> Next<'a> {
    pub async fn run(self) -> CallResult {
        match self.chain.split_first() {
            Some((head, rest)) => {
                let next = Next {
                    chain: rest,
                    call: self.call,
                    handler: self.handler,
                };
                head.intercept(self.call, next).await
            }
            None => self.handler.await,
        }
    }
}

/// Ordered list of interceptors. Cheap to share behind an `Arc`.
#[derive(Clone, Default)]
pub struct Pipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recovery outermost, logging adjacent to the handler.
    pub fn standard() -> Self {
        Self::new()
            .with(RecoveryInterceptor::new())
            .with(LoggingInterceptor::new())
    }

    /// Appends an interceptor; it runs inside every one added before it.
    pub fn with<I>(mut self, interceptor: I) -> Self
    where
        I: Interceptor + 'static,
    {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub async fn dispatch<'a, F>(&'a self, call: &'a CallInfo, handler: F) -> CallResult
    where
        F: Future<Output = CallResult> + Send + 'a,
    {
        Next {
            chain: &self.interceptors,
            call,
            handler: Box::pin(handler),
        }
        .run()
        .await
    }
}
