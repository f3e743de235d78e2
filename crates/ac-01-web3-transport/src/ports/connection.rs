//! Chain connection capability shared by the HTTP and WebSocket variants.

use std::sync::Arc;

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;

use crate::contract::Contract;
use crate::ports::chain::ChainClient;

/// Produces contract handles bound to one node connection.
pub trait Web3Connection: Send + Sync {
    /// The client every handle produced by this connection talks through.
    fn client(&self) -> Arc<dyn ChainClient>;

    /// Handle for a deployed contract.
    fn contract(&self, address: Address, abi: Arc<JsonAbi>) -> Contract {
        Contract::at(self.client(), address, abi)
    }

    /// Handle with no address yet, used to deploy a new instance.
    fn contract_for_deployment(&self, abi: Arc<JsonAbi>) -> Contract {
        Contract::for_deployment(self.client(), abi)
    }
}
