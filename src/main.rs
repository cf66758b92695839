use anyhow::{Context, Result};
use clap::Parser;
use memusers::server::shutdown_signal;
use memusers::{AppConfig, AppState, Cli, UserServer, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()
        .context("failed to load configuration")?
        .merge_cli(cli);

    logging::init(&config).context("failed to initialize logging")?;

    let server = UserServer::new(config, AppState::in_memory());
    let listener = match server.bind().await {
        Ok(listener) => listener,
        Err(err) => logging::fatal("failed to listen", &err),
    };

    if let Err(err) = server.serve(listener, shutdown_signal()).await {
        logging::fatal("failed to serve", &err);
    }

    Ok(())
}
