//! Oracle entry point.

use ac_05_oracle::{serve, telemetry, OracleConfig};
use anyhow::{Context, Result};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = OracleConfig::from_env();
    telemetry::init(&config).context("initializing tracing")?;

    info!(ws = %config.websocket.url, http = %config.http.url, "Starting oracle");
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Listening for Ctrl-C failed");
        }
    };

    serve(config, shutdown).await.context("oracle stopped")?;
    Ok(())
}
