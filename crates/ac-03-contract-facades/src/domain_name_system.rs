//! Logical contract name to deployed address.
//!
//! Lookup failure modes, in order: the call itself fails (propagated), the
//! registry answers the zero address ("domain address is unknown"), or the
//! address is returned.

use ac_02_contract_gateway::{ContractError, ContractInteractionError};
use serde_json::json;
use shared_types::{DomainName, EthereumAddress};
use tracing::{debug, info};

use crate::support::{account, address, text};

facade! {
    DomainNameSystem
}

impl DomainNameSystem {
    pub async fn update(
        &self,
        domain: &DomainName,
        target: &EthereumAddress,
    ) -> Result<(), ContractError> {
        self.contract
            .send(
                "update",
                vec![text(domain.value()), address(target)],
                |receipt| {
                    info!(domain = %domain, address = %target, "Domain address updated");
                    self.contract.log_contract(
                        "update",
                        json!({
                            "domain": domain.value(),
                            "address": target.value(),
                            "transactionHash": format!("{:?}", receipt.transaction_hash),
                        }),
                    );
                    Ok(())
                },
            )
            .await
    }

    pub async fn lookup(&self, domain: &DomainName) -> Result<EthereumAddress, ContractError> {
        let resolved = self
            .contract
            .call("lookup", vec![text(domain.value())], account)
            .await?;
        debug!(domain = %domain, address = %resolved, "Domain lookup");

        if resolved.is_unknown() {
            return Err(ContractInteractionError::Other(format!(
                "{} domain address is unknown",
                domain
            ))
            .into());
        }
        Ok(resolved)
    }
}
