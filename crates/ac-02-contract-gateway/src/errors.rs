//! Error types for contract interaction and deployment.
//!
//! The rendered message of [`ContractInteractionError::Failed`] is relied on
//! by callers to tell apart reverts, missing data and transport trouble:
//!
//! ```text
//! Actions @ 0xABC remove ( 0 ) failed. <cause>
//! Agents @ 0x5F2... lastAgentId () failed. <cause>
//! ```

use ac_01_web3_transport::{abi, AbiError, DynSolValue};
use shared_types::ValidationError;
use thiserror::Error;

/// A read or write against a deployed contract did not produce a usable result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractInteractionError {
    /// The gateway invocation failed; the cause is the underlying error text.
    #[error("{contract} @ {address} {method} {} failed. {cause}", render_arguments(.arguments))]
    Failed {
        contract: String,
        address: String,
        method: String,
        arguments: Vec<String>,
        cause: String,
    },

    /// The contract answered with the zero sentinel in the primary identifier.
    #[error("{facade} {method} ( {id} ) failed to return a value.")]
    NotFound {
        facade: String,
        method: String,
        id: String,
    },

    #[error("{0}")]
    Other(String),
}

impl ContractInteractionError {
    pub fn failed_call(
        contract: &str,
        address: &str,
        method: &str,
        arguments: &[DynSolValue],
        cause: impl ToString,
    ) -> Self {
        Self::Failed {
            contract: contract.to_string(),
            address: address.to_string(),
            method: method.to_string(),
            arguments: arguments.iter().map(abi::render).collect(),
            cause: cause.to_string(),
        }
    }

    pub fn not_found(facade: &str, method: &str, id: impl ToString) -> Self {
        Self::NotFound {
            facade: facade.to_string(),
            method: method.to_string(),
            id: id.to_string(),
        }
    }

    /// True when the failure, possibly after wrapping, reports missing data.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Failed { cause, .. } => cause.ends_with("failed to return a value."),
            Self::Other(_) => false,
        }
    }
}

/// `( a, b )` for arguments, `()` for none.
pub fn render_arguments(arguments: &[String]) -> String {
    if arguments.is_empty() {
        "()".to_string()
    } else {
        format!("( {} )", arguments.join(", "))
    }
}

/// Gas estimation or submission of a deployment failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractDeploymentError {
    #[error("{contract} contract gas estimation failed: {reason}")]
    GasEstimation { contract: String, reason: String },

    #[error("{contract} contract deployment failed: {reason}")]
    Deployment { contract: String, reason: String },
}

/// ABI or bytecode for a contract name could not be produced.
///
/// A missing mapping is a wiring mistake, not a domain failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("{0} has no mapped ABI source")]
    UnmappedAbi(String),

    #[error("{0} has no mapped BIN source")]
    UnmappedBinary(String),

    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("{contract} ABI is invalid: {source}")]
    InvalidAbi {
        contract: String,
        #[source]
        source: AbiError,
    },

    #[error("{contract} binary is not hex encoded: {reason}")]
    InvalidBinary { contract: String, reason: String },
}

/// Every failure a facade operation can report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error(transparent)]
    Interaction(#[from] ContractInteractionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Deployment(#[from] ContractDeploymentError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl ContractError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContractError::Interaction(e) if e.is_not_found())
    }
}
