//! Network front: binds a listener and serves the HTTP router until shutdown.

pub mod router;
pub mod state;

use std::future::Future;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::AppConfig;

pub use router::build_router;
pub use state::AppState;

pub struct UserServer {
    config: AppConfig,
    state: AppState,
}

impl UserServer {
    pub fn new(config: AppConfig, state: AppState) -> Self {
        let describe = config.is_development();
        Self {
            config,
            state: state.describe(describe),
        }
    }

    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.bind_addr();
        TcpListener::bind(addr.as_str())
            .await
            .with_context(|| format!("failed to listen on {addr}"))
    }

    /// Serves until `shutdown` resolves, then drains in-flight calls.
    pub async fn serve<S>(self, listener: TcpListener, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr().context("listener has no local address")?;
        info!(
            addr = %local_addr,
            environment = %self.config.environment,
            "starting user server"
        );

        let app = build_router(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("server error")?;

        info!("server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install ctrl+c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install sigterm handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutting down server...");
}
