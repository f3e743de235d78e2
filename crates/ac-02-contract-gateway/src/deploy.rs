//! Deployment primitive: estimate, pad, submit, extract the address.

use ac_01_web3_transport::{DynSolValue, TxOptions};
use shared_types::EthereumAddress;
use tracing::{debug, info};

use crate::environment::ContractEnvironment;
use crate::errors::{ContractDeploymentError, ContractError};

/// Safety margin over the node's estimate, as a ratio (20 %).
const GAS_MARGIN: (u64, u64) = (12, 10);

/// Pad a gas estimate by 20 %, truncated toward zero. Never below the
/// estimate itself, even where the product saturates.
pub fn pad_gas(estimate: u64) -> u64 {
    (estimate.saturating_mul(GAS_MARGIN.0) / GAS_MARGIN.1).max(estimate)
}

/// Deploy the contract registered as `name` and return its address.
pub async fn deploy_contract(
    env: &ContractEnvironment,
    name: &str,
    args: Vec<DynSolValue>,
) -> Result<EthereumAddress, ContractError> {
    let bytecode = env.sources().binary(name)?;
    let handle = env.contract_for_deployment(name)?;
    let sender = env.sender().to_address();

    debug!(
        contract = name,
        arguments = ?args,
        "Contract deployment gas estimation"
    );
    let estimate = handle
        .estimate_deployment(&bytecode, &args, Some(sender))
        .await
        .map_err(|e| ContractDeploymentError::GasEstimation {
            contract: name.to_string(),
            reason: e.to_string(),
        })?;
    let gas = pad_gas(estimate);
    debug!(contract = name, estimate, gas, "Contract deployment gas");

    let options = TxOptions {
        from: Some(sender),
        gas: Some(gas),
    };
    let (deployed, receipt) = handle
        .deploy(&bytecode, &args, options)
        .await
        .map_err(|e| ContractDeploymentError::Deployment {
            contract: name.to_string(),
            reason: e.to_string(),
        })?;
    debug!(
        contract = name,
        transaction_hash = ?receipt.transaction_hash,
        gas_used = ?receipt.gas_used,
        "Contract deployment receipt"
    );

    let address = deployed
        .address()
        .map(EthereumAddress::from_address)
        .ok_or_else(|| ContractDeploymentError::Deployment {
            contract: name.to_string(),
            reason: format!("{} contract address was undefined", name),
        })?;
    info!(contract = name, address = %address, "Contract deployed");
    Ok(address)
}

/// A typed facade over one logical contract.
pub trait Facade: Sized {
    /// Logical name, also the key into the source registry.
    const NAME: &'static str;

    fn at(env: &ContractEnvironment, address: EthereumAddress) -> Result<Self, ContractError>;
}

/// Deploy `F`'s contract and wrap the new address in the facade.
pub async fn deploy_facade<F: Facade>(
    env: &ContractEnvironment,
    args: Vec<DynSolValue>,
) -> Result<F, ContractError> {
    let address = deploy_contract(env, F::NAME, args).await?;
    F::at(env, address)
}
