//! Argument lowering and result parsing shared by the facades.

use ac_01_web3_transport::DynSolValue;
use ac_02_contract_gateway::{ContractError, ContractInteractionError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared_types::{EthereumAddress, U256};

pub(crate) fn uint(value: U256) -> DynSolValue {
    DynSolValue::Uint(value, 256)
}

pub(crate) fn address(value: &EthereumAddress) -> DynSolValue {
    DynSolValue::Address(value.to_address())
}

pub(crate) fn text(value: &str) -> DynSolValue {
    DynSolValue::String(value.to_string())
}

/// Deserialize a decoded result into its raw receipt shape.
pub(crate) fn parse_receipt<T: DeserializeOwned>(value: Value) -> Result<T, ContractError> {
    serde_json::from_value(value).map_err(|e| {
        ContractInteractionError::Other(format!("Unexpected return value: {}", e)).into()
    })
}

/// A single `uint256` result rendered as a decimal string.
pub(crate) fn decimal(value: Value) -> Result<String, ContractError> {
    parse_receipt::<String>(value)
}

/// A single `address` result; the zero address is admitted.
pub(crate) fn account(value: Value) -> Result<EthereumAddress, ContractError> {
    Ok(EthereumAddress::of(parse_receipt::<String>(value)?)?)
}
