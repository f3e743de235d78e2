//! Oracle error types.

use ac_01_web3_transport::{ConfigError, TransportError};
use ac_02_contract_gateway::ContractError;
use ac_04_event_listeners::ListenerError;
use shared_types::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OracleError {
    #[error("Invalid oracle configuration: {0}")]
    Config(String),

    #[error("Invalid {field}: {source}")]
    Address {
        field: &'static str,
        source: ValidationError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("Loading organization {id} failed: {source}")]
    OrganizationLoad { id: String, source: ContractError },

    #[error("Notification for challenge {challenge} failed: {reason}")]
    Notify { challenge: String, reason: String },

    #[error("Telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl From<ConfigError> for OracleError {
    fn from(error: ConfigError) -> Self {
        OracleError::Config(error.to_string())
    }
}
