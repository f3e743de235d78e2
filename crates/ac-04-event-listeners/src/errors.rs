//! Listener error types.

use ac_02_contract_gateway::ContractError;
use shared_types::ValidationError;
use thiserror::Error;

/// Failures while registering a listener or handling one emission.
///
/// Only registration failures reach the caller. Per-emission failures are
/// logged by the delivery task and the subscription carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerError {
    #[error("{contract} @ {address} could not subscribe to {event} events: {reason}")]
    Subscribe {
        contract: String,
        address: String,
        event: String,
        reason: String,
    },

    #[error("{event} event stream failed: {reason}")]
    Stream { event: String, reason: String },

    #[error("{event} event payload is malformed: {reason}")]
    Payload { event: String, reason: String },

    #[error("{contract} could not cancel subscription {subscription}: {reason}")]
    Unsubscribe {
        contract: String,
        subscription: String,
        reason: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Contract(#[from] ContractError),
}
