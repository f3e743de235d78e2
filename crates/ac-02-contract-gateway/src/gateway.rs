//! The call/send primitive every facade routes through.
//!
//! One variadic operation per family replaces fixed-arity overloads:
//! arguments are an ordered `Vec<DynSolValue>` and the caller supplies a handler
//! that turns the decoded result (or receipt) into its own type.
//!
//! ```text
//! Invoked ──► transport ──┬─ ok ──► log result ──► handler ──► return
//!                         └─ err ─► wrap "<Name> @ <addr> <method> ( .. ) failed. <cause>"
//! ```

use ac_01_web3_transport::{abi, Contract, DynSolValue, TransactionReceipt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared_types::EthereumAddress;
use tracing::{debug, info, trace, Level};

use crate::environment::ContractEnvironment;
use crate::errors::{render_arguments, ContractError, ContractInteractionError};

/// A deployed contract bound to a logical name.
///
/// Immutable for its lifetime and owned by the facade that created it.
#[derive(Debug, Clone)]
pub struct SolidityContract {
    name: String,
    address: EthereumAddress,
    handle: Contract,
    env: ContractEnvironment,
}

impl SolidityContract {
    pub fn new(
        env: &ContractEnvironment,
        name: &str,
        address: EthereumAddress,
    ) -> Result<Self, ContractError> {
        let handle = env.contract_at(name, &address)?;
        debug!(contract = name, address = %address, "Contract handle created");
        Ok(Self {
            name: name.to_string(),
            address,
            handle,
            env: env.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &EthereumAddress {
        &self.address
    }

    pub fn environment(&self) -> &ContractEnvironment {
        &self.env
    }

    pub fn handle(&self) -> &Contract {
        &self.handle
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Non-mutating invocation; `handler` receives the decoded result.
    pub async fn call<R, F>(
        &self,
        method: &str,
        args: Vec<DynSolValue>,
        handler: F,
    ) -> Result<R, ContractError>
    where
        F: FnOnce(Value) -> Result<R, ContractError>,
    {
        self.log_invocation(method, &args);
        let result = self
            .handle
            .call(method, &args, self.env.tx_options())
            .await
            .map_err(|e| self.failure(method, &args, e))?;
        if tracing::enabled!(Level::TRACE) {
            trace!(
                contract = %self.name,
                address = %self.address,
                "{} @ {} {} {}",
                self.name,
                self.address,
                method,
                result
            );
        }
        handler(result).map_err(|e| self.wrap_handler_error(method, &args, e))
    }

    /// Read and deserialize the decoded result directly.
    pub async fn call_value<T: DeserializeOwned>(
        &self,
        method: &str,
        args: Vec<DynSolValue>,
    ) -> Result<T, ContractError> {
        self.call(method, args, |value| {
            serde_json::from_value(value).map_err(|e| {
                ContractInteractionError::Other(format!("Unexpected return value: {}", e)).into()
            })
        })
        .await
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Mutating invocation from the environment's sender; waits for the
    /// receipt and hands it to `handler`.
    pub async fn send<R, F>(
        &self,
        method: &str,
        args: Vec<DynSolValue>,
        handler: F,
    ) -> Result<R, ContractError>
    where
        F: FnOnce(TransactionReceipt) -> Result<R, ContractError>,
    {
        self.log_invocation(method, &args);
        let receipt = self
            .handle
            .send(method, &args, self.env.tx_options())
            .await
            .map_err(|e| self.failure(method, &args, e))?;
        if tracing::enabled!(Level::TRACE) {
            trace!(
                contract = %self.name,
                address = %self.address,
                transaction_hash = ?receipt.transaction_hash,
                "{} @ {} {} {:?}",
                self.name,
                self.address,
                method,
                receipt
            );
        }
        handler(receipt).map_err(|e| self.wrap_handler_error(method, &args, e))
    }

    /// Send where success carries no value.
    pub async fn send_unit(&self, method: &str, args: Vec<DynSolValue>) -> Result<(), ContractError> {
        self.send(method, args, |_| Ok(())).await
    }

    pub async fn destroy(&self) -> Result<(), ContractError> {
        self.send_unit("destroy", Vec::new()).await?;
        info!(contract = %self.name, address = %self.address, "Contract has been destroyed");
        Ok(())
    }

    /// Post-success line: `<Name> @ <address> <description> <fields>`.
    pub fn log_contract(&self, description: &str, fields: Value) {
        if tracing::enabled!(Level::DEBUG) {
            if fields.is_null() {
                debug!(
                    contract = %self.name,
                    "{} @ {} {}",
                    self.name,
                    self.address,
                    description
                );
            } else {
                debug!(
                    contract = %self.name,
                    "{} @ {} {} {}",
                    self.name,
                    self.address,
                    description,
                    fields
                );
            }
        }
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// The invocation at three depths: INFO names it, DEBUG adds the
    /// rendered arguments, TRACE the raw values.
    fn log_invocation(&self, method: &str, args: &[DynSolValue]) {
        if tracing::enabled!(Level::INFO) {
            info!(
                contract = %self.name,
                address = %self.address,
                "{} @ {} {}",
                self.name,
                self.address,
                method
            );
        }
        if tracing::enabled!(Level::DEBUG) {
            let rendered: Vec<String> = args.iter().map(abi::render).collect();
            debug!(
                contract = %self.name,
                address = %self.address,
                "{} @ {} {} {}",
                self.name,
                self.address,
                method,
                render_arguments(&rendered)
            );
        }
        if tracing::enabled!(Level::TRACE) {
            trace!(
                contract = %self.name,
                address = %self.address,
                "{} @ {} {} {:?}",
                self.name,
                self.address,
                method,
                args
            );
        }
    }

    fn failure(&self, method: &str, args: &[DynSolValue], cause: impl ToString) -> ContractError {
        ContractInteractionError::failed_call(
            &self.name,
            self.address.value(),
            method,
            args,
            cause,
        )
        .into()
    }

    /// Interaction failures raised by a handler gain the call signature;
    /// validation failures pass through untouched.
    fn wrap_handler_error(&self, method: &str, args: &[DynSolValue], error: ContractError) -> ContractError {
        match error {
            ContractError::Interaction(inner) => self.failure(method, args, inner),
            other => other,
        }
    }
}
