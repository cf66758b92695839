//! Logging backend for the binary.
//!
//! Library code only emits `tracing` events; this module decides where they
//! go. Development gets human-readable lines, every other environment gets
//! JSON. `RUST_LOG`, when set, wins over the configured level.

use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

/// Maps a configured level onto a filter directive. Unknown values fall back
/// to `info`.
pub fn normalize_level(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

fn default_directives(level: &str) -> String {
    let level = normalize_level(level);
    format!("memusers={level},tower_http={level}")
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_development() {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .try_init()?;
    }

    Ok(())
}

/// Logs `err` at error level and terminates the process with status 1.
pub fn fatal(message: &str, err: &anyhow::Error) -> ! {
    error!(error = %format!("{err:#}"), "{message}");
    std::process::exit(1)
}
