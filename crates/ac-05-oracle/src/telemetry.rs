//! Process-wide tracing subscriber.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::OracleConfig;
use crate::errors::OracleError;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Fails if a subscriber is already installed.
pub fn init(config: &OracleConfig) -> Result<(), OracleError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| OracleError::Telemetry(e.to_string()))?;

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| OracleError::Telemetry(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| OracleError::Telemetry(e.to_string()))?;
    }

    tracing::info!(
        level = %config.log_level,
        json = config.json_logs,
        "Tracing initialized"
    );
    Ok(())
}
