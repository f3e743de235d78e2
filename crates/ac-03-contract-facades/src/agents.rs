use ac_02_contract_gateway::{ContractError, ContractInteractionError, Facade};
use serde_json::json;
use shared_types::{Agent, AgentId, AgentName, AgentUsername};

use crate::receipts::{is_sentinel, AgentReceipt};
use crate::support::{decimal, parse_receipt, text, uint};

facade! {
    /// Registry of agents, the people who answer challenges.
    Agents
}

impl Agents {
    pub async fn create(
        &self,
        name: &AgentName,
        username: &AgentUsername,
    ) -> Result<(), ContractError> {
        self.contract
            .send(
                "create",
                vec![text(name.value()), text(username.value())],
                |_| {
                    self.contract.log_contract(
                        "created Agent",
                        json!({"name": name.value(), "username": username.value()}),
                    );
                    Ok(())
                },
            )
            .await
    }

    pub async fn last_agent_id(&self) -> Result<AgentId, ContractError> {
        self.contract
            .call("lastAgentId", Vec::new(), |value| {
                Ok(AgentId::parse(&decimal(value)?)?)
            })
            .await
    }

    pub async fn get(&self, id: AgentId) -> Result<Agent, ContractError> {
        self.contract
            .call("get", vec![uint(id.value())], |value| {
                let receipt: AgentReceipt = parse_receipt(value)?;
                if is_sentinel(&receipt.id) {
                    return Err(ContractInteractionError::not_found(Self::NAME, "get", id).into());
                }
                Ok(receipt.inflate()?)
            })
            .await
    }

    pub async fn remove(&self, id: AgentId) -> Result<(), ContractError> {
        self.contract
            .send("remove", vec![uint(id.value())], |_| {
                self.contract
                    .log_contract("removed Agent", json!({"id": id.to_string()}));
                Ok(())
            })
            .await
    }
}
