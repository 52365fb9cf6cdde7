//! ticketd - help-desk ticketing server.
//!
//! Binds the HTTP API, opens the ticket store, and serves until ctrl-c.
//! Fatal setup errors (unopenable store, bind failure) terminate the
//! process; run under a supervisor for restarts.

use std::fs;

use ticketd::config::Config;
use ticketd::server::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ticketd=info")),
        )
        .init();

    let config = Config::from_env();
    fs::create_dir_all(&config.data_dir)?;
    tracing::info!(data_dir = ?config.data_dir, port = config.port, "Starting ticketd");

    let state = AppState::new(config)?;
    ticketd::server::run_server(state).await?;

    tracing::info!("ticketd has exited");
    Ok(())
}
