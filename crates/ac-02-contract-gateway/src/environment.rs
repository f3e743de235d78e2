//! Explicit context threaded through every facade.

use std::sync::Arc;

use ac_01_web3_transport::{Contract, TxOptions, Web3Connection};
use shared_types::EthereumAddress;

use crate::errors::SourceError;
use crate::settings::GatewaySettings;
use crate::sources::ContractSources;

/// Everything a contract handle needs: the connection, the account that
/// signs sends, the source registry and the gas ceiling.
#[derive(Clone)]
pub struct ContractEnvironment {
    connection: Arc<dyn Web3Connection>,
    sender: EthereumAddress,
    sources: Arc<ContractSources>,
    settings: GatewaySettings,
}

impl std::fmt::Debug for ContractEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractEnvironment")
            .field("endpoint", &self.connection.client().endpoint())
            .field("sender", &self.sender)
            .field("settings", &self.settings)
            .finish()
    }
}

impl ContractEnvironment {
    pub fn new(
        connection: Arc<dyn Web3Connection>,
        sender: EthereumAddress,
        sources: Arc<ContractSources>,
        settings: GatewaySettings,
    ) -> Self {
        Self {
            connection,
            sender,
            sources,
            settings,
        }
    }

    /// Same sender, sources and settings over another connection.
    pub fn with_connection(&self, connection: Arc<dyn Web3Connection>) -> Self {
        Self {
            connection,
            ..self.clone()
        }
    }

    pub fn connection(&self) -> &Arc<dyn Web3Connection> {
        &self.connection
    }

    pub fn sender(&self) -> &EthereumAddress {
        &self.sender
    }

    pub fn sources(&self) -> &ContractSources {
        &self.sources
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Options applied to every call and send.
    pub fn tx_options(&self) -> TxOptions {
        TxOptions {
            from: Some(self.sender.to_address()),
            gas: Some(self.settings.maximum_gas),
        }
    }

    pub fn contract_at(&self, name: &str, address: &EthereumAddress) -> Result<Contract, SourceError> {
        let abi = self.sources.abi(name)?;
        Ok(self
            .connection
            .contract(address.to_address(), abi)
            .with_receipt_polling(self.settings.receipt_polling()))
    }

    pub fn contract_for_deployment(&self, name: &str) -> Result<Contract, SourceError> {
        let abi = self.sources.abi(name)?;
        Ok(self
            .connection
            .contract_for_deployment(abi)
            .with_receipt_polling(self.settings.receipt_polling()))
    }
}
