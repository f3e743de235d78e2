//! Error types for the chain transport.

use alloy::transports::{RpcError, TransportErrorKind};
use serde_json::Value;
use thiserror::Error;

/// Close code reported when the node side of a socket disappears.
pub const ABNORMAL_CLOSURE: u16 = 1006;

/// JSON-RPC error object returned by the node.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

// =============================================================================
// ABI ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// The ABI document itself is malformed.
    #[error("Invalid ABI: {0}")]
    Parse(String),

    #[error("Unsupported ABI type: {0}")]
    UnsupportedType(String),

    #[error("Function {name} with {arity} argument(s) not found in ABI")]
    FunctionNotFound { name: String, arity: usize },

    #[error("Event {0} not found in ABI")]
    EventNotFound(String),

    #[error("Invalid arguments for {name}: {reason}")]
    InvalidArguments { name: String, reason: String },

    #[error("Invalid ABI data: {0}")]
    InvalidData(String),

    /// Empty return data for a method that declares outputs.
    #[error("Returned values aren't valid, did it run Out of Gas? The contract may not be deployed at this address or the ABI may not match.")]
    InvalidReturnValues,
}

// =============================================================================
// TRANSPORT ERRORS
// =============================================================================

/// Connection-level and protocol-level failures. Never retried by the
/// transport itself.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Node unreachable (connection refused, DNS failure).
    #[error("CONNECTION ERROR: Couldn't connect to node {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("CONNECTION TIMEOUT: request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// The persistent connection has ended and will not recover on its own.
    #[error("CONNECTION ERROR: The connection got closed with the close code {code} and the following reason string {reason}")]
    Closed { code: u16, reason: String },

    /// The node answered with a JSON-RPC error object.
    #[error("{}", .0.message)]
    Rpc(RpcErrorObject),

    #[error("Invalid JSON RPC response: {0}")]
    InvalidResponse(String),

    #[error("The current provider doesn't support subscriptions: {0}")]
    SubscriptionsUnsupported(String),

    /// The client could not be built from its options.
    #[error("Transport setup failed: {0}")]
    Setup(String),
}

impl TransportError {
    /// Classify a failure reported by an alloy provider talking to `url`.
    pub fn from_rpc(url: &str, error: RpcError<TransportErrorKind>) -> Self {
        match error {
            RpcError::ErrorResp(payload) => TransportError::Rpc(RpcErrorObject {
                code: payload.code,
                message: payload.message.to_string(),
                data: payload
                    .data
                    .and_then(|raw| serde_json::from_str(raw.get()).ok()),
            }),
            RpcError::Transport(TransportErrorKind::BackendGone) => TransportError::Closed {
                code: ABNORMAL_CLOSURE,
                reason: "backend connection task has stopped".to_string(),
            },
            RpcError::Transport(TransportErrorKind::PubsubUnavailable) => {
                TransportError::SubscriptionsUnsupported(url.to_string())
            }
            RpcError::Transport(kind) => TransportError::Connection {
                url: url.to_string(),
                reason: kind.to_string(),
            },
            other => TransportError::InvalidResponse(other.to_string()),
        }
    }

    /// True when the connection this error came from is gone for good.
    pub fn is_closed(&self) -> bool {
        matches!(self, TransportError::Closed { .. })
    }
}

// =============================================================================
// WEB3 ERRORS
// =============================================================================

/// Failure of a contract-level operation (call, send, deploy, subscribe).
#[derive(Debug, Clone, Error)]
pub enum Web3Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Abi(#[from] AbiError),

    /// Included but reverted.
    #[error("Transaction has been reverted by the EVM: {transaction_hash}")]
    Reverted { transaction_hash: String },

    #[error("Transaction {transaction_hash} was not mined within {attempts} attempts")]
    ReceiptTimeout {
        transaction_hash: String,
        attempts: u32,
    },

    #[error("Deployment receipt {transaction_hash} carries no contract address")]
    MissingContractAddress { transaction_hash: String },

    /// The handle was created for deployment and has no address yet.
    #[error("This contract object doesn't have address set yet, please set an address first.")]
    NoAddress,
}
