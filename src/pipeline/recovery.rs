use std::any::Any;
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::error;

use super::{CallInfo, CallResult, Interceptor, Next};
use crate::status::Status;

const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

/// Turns a panic anywhere below it into an `Internal` status.
///
/// The panic is caught on the task that polled the call, so neither the
/// connection nor the process goes down with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryInterceptor;

impl RecoveryInterceptor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Interceptor for RecoveryInterceptor {
    async fn intercept<'a>(&'a self, call: &'a CallInfo, next: Next<'a>) -> CallResult {
        match AssertUnwindSafe(next.run()).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(payload) => {
                error!(
                    method = call.method(),
                    call_id = %call.call_id(),
                    panic = %panic_message(payload.as_ref()),
                    "call panicked, recovered"
                );
                Err(Status::internal())
            }
        }
    }
}

/// Best-effort text of a panic payload, single-line and capped.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    let normalized = message.replace(['\n', '\r'], " ");
    let mut truncated: String = normalized.chars().take(MAX_PANIC_PAYLOAD_CHARS).collect();
    if normalized.chars().count() > MAX_PANIC_PAYLOAD_CHARS {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::panic_message;

    #[test]
    fn extracts_str_and_string_payloads() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("kaboom\nline"));
        assert_eq!(panic_message(payload.as_ref()), "kaboom line");

        let payload: Box<dyn std::any::Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }

    #[test]
    fn long_payloads_are_truncated() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("x".repeat(500));
        let message = panic_message(payload.as_ref());
        assert_eq!(message.chars().count(), 163);
        assert!(message.ends_with("..."));
    }
}
