use anyhow::{Context, Result};
use clap::Parser;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Server configuration
///
/// Loaded from `HOST`, `PORT`, `ENVIRONMENT` and `LOG_LEVEL`, then
/// optionally overridden from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to listen on
    pub host: String,

    /// TCP port to listen on
    pub port: u16,

    /// Deployment environment name (`development` enables the method listing)
    pub environment: String,

    /// Log level: trace, debug, info, warn or error
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got `{port}`"))?;
        }
        if let Some(environment) = get("ENVIRONMENT") {
            config.environment = environment;
        }
        if let Some(log_level) = get("LOG_LEVEL") {
            config.log_level = log_level;
        }

        Ok(config)
    }

    /// Set the host
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the environment name
    pub fn environment(mut self, environment: &str) -> Self {
        self.environment = environment.to_string();
        self
    }

    /// Set the log level
    pub fn log_level(mut self, log_level: &str) -> Self {
        self.log_level = log_level.to_string();
        self
    }

    /// Applies any values given on the command line.
    pub fn merge_cli(mut self, cli: Cli) -> Self {
        if let Some(host) = cli.host {
            self.host = host;
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(environment) = cli.environment {
            self.environment = environment;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Command-line overrides; anything omitted falls back to the environment.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "memusers", version, about = "In-memory user service")]
pub struct Cli {
    /// Interface to listen on [env: HOST]
    #[arg(long)]
    pub host: Option<String>,

    /// TCP port to listen on [env: PORT]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Deployment environment [env: ENVIRONMENT]
    #[arg(short, long)]
    pub environment: Option<String>,

    /// Log level [env: LOG_LEVEL]
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use clap::Parser;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert!(config.is_development());
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "9090"),
            ("ENVIRONMENT", "production"),
            ("LOG_LEVEL", "debug"),
            ("HOST", ""),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.log_level, "debug");
        assert!(!config.is_development());
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn cli_overrides_environment() {
        let cli = Cli::parse_from(["memusers", "--port", "7000", "-e", "staging"]);
        let config = AppConfig::default().port(1234).merge_cli(cli);

        assert_eq!(config.port, 7000);
        assert_eq!(config.environment, "staging");
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }
}
