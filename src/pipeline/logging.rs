use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::{CallInfo, CallResult, Interceptor, Next};
use crate::status::Code;

/// Logs every call on the way in and its outcome on the way out.
///
/// A call that never returns here, because it panicked or because its future
/// was dropped, is still reported: the in-flight guard logs it from `Drop`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInterceptor;

impl LoggingInterceptor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Interceptor for LoggingInterceptor {
    async fn intercept<'a>(&'a self, call: &'a CallInfo, next: Next<'a>) -> CallResult {
        info!(
            method = call.method(),
            call_id = %call.call_id(),
            request = call.payload(),
            "request started"
        );

        let mut in_flight = InFlight::new(call);
        let outcome = next.run().await;
        let duration = in_flight.finish();

        match &outcome {
            Ok(_) => info!(
                method = call.method(),
                call_id = %call.call_id(),
                duration = ?duration,
                "request completed"
            ),
            Err(status) => error!(
                method = call.method(),
                call_id = %call.call_id(),
                duration = ?duration,
                code = %status.code(),
                error_message = status.message(),
                "request failed"
            ),
        }

        outcome
    }
}

struct InFlight<'a> {
    call: &'a CallInfo,
    started: Instant,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn new(call: &'a CallInfo) -> Self {
        Self {
            call,
            started: Instant::now(),
            finished: false,
        }
    }

    fn finish(&mut self) -> Duration {
        self.finished = true;
        self.started.elapsed()
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        let duration = self.started.elapsed();
        if std::thread::panicking() {
            error!(
                method = self.call.method(),
                call_id = %self.call.call_id(),
                duration = ?duration,
                code = %Code::Internal,
                "request aborted by panic"
            );
        } else {
            warn!(
                method = self.call.method(),
                call_id = %self.call.call_id(),
                duration = ?duration,
                "request cancelled"
            );
        }
    }
}
