use ac_02_contract_gateway::{ContractError, ContractInteractionError, Facade};
use serde_json::{json, Value};
use shared_types::{ActionId, ChallengeId, EthereumAddress, OrganizationId, PolicyId};

use crate::support::{account, address, decimal, uint};

facade! {
    /// One organization: its policies and the views derived from them.
    Organization
}

impl Organization {
    pub async fn init(&self, id: OrganizationId) -> Result<(), ContractError> {
        self.contract
            .send("init", vec![uint(id.value())], |_| {
                self.contract
                    .log_contract("has init", json!({"id": id.to_string()}));
                Ok(())
            })
            .await
    }

    pub async fn add_policy(&self, policy: &EthereumAddress) -> Result<(), ContractError> {
        self.contract
            .send("addPolicy", vec![address(policy)], |_| {
                self.contract
                    .log_contract("added Policy", json!({"address": policy.value()}));
                Ok(())
            })
            .await
    }

    pub async fn start_authorization(&self, policy: PolicyId) -> Result<(), ContractError> {
        self.contract
            .send("startAuthorization", vec![uint(policy.value())], |_| {
                self.contract
                    .log_contract("authorized Policy", json!({"id": policy.to_string()}));
                Ok(())
            })
            .await
    }

    pub async fn challenge_response(
        &self,
        policy: PolicyId,
        action: ActionId,
        challenge: ChallengeId,
        approved: bool,
    ) -> Result<(), ContractError> {
        let args = vec![
            uint(policy.value()),
            uint(action.value()),
            uint(challenge.value()),
            approved.into(),
        ];
        self.contract
            .send("challengeResponse", args, |_| {
                self.contract.log_contract(
                    "processed challenge response",
                    json!({
                        "policyId": policy.to_string(),
                        "actionId": action.to_string(),
                        "challengeId": challenge.to_string(),
                        "approval": approved,
                    }),
                );
                Ok(())
            })
            .await
    }

    pub async fn tick(&self) -> Result<(), ContractError> {
        self.contract
            .send("tick", Vec::new(), |_| {
                self.contract.log_contract("ticked", Value::Null);
                Ok(())
            })
            .await
    }

    pub async fn organization_id(&self) -> Result<OrganizationId, ContractError> {
        self.contract
            .call("getOrganizationId", Vec::new(), |value| {
                Ok(OrganizationId::parse(&decimal(value)?)?)
            })
            .await
    }

    pub async fn agent_challenges_view_address(&self) -> Result<EthereumAddress, ContractError> {
        self.contract
            .call("agentChallengeViewAddress", Vec::new(), account)
            .await
    }

    pub async fn challenges_address(&self) -> Result<EthereumAddress, ContractError> {
        self.contract
            .call("challengesAddress", Vec::new(), account)
            .await
    }
}

facade! {
    /// Registry of organization contracts, numbered from 1.
    Organizations
}

impl Organizations {
    pub async fn add(&self, organization: &EthereumAddress) -> Result<(), ContractError> {
        self.contract
            .send("add", vec![address(organization)], |_| {
                self.contract.log_contract(
                    "added and initialized",
                    json!({"address": organization.value()}),
                );
                Ok(())
            })
            .await
    }

    pub async fn last_organization_id(&self) -> Result<OrganizationId, ContractError> {
        self.contract
            .call("lastOrganizationId", Vec::new(), |value| {
                Ok(OrganizationId::parse(&decimal(value)?)?)
            })
            .await
    }

    /// Address of organization `id`; the zero address means there is none.
    pub async fn get(&self, id: OrganizationId) -> Result<EthereumAddress, ContractError> {
        self.contract
            .call("get", vec![uint(id.value())], |value| {
                let organization = account(value)?;
                if organization.is_unknown() {
                    return Err(ContractInteractionError::not_found(Self::NAME, "get", id).into());
                }
                Ok(organization)
            })
            .await
    }

    pub async fn remove(&self, id: OrganizationId) -> Result<(), ContractError> {
        self.contract
            .send("remove", vec![uint(id.value())], |_| {
                self.contract
                    .log_contract("removed organization", json!({"id": id.to_string()}));
                Ok(())
            })
            .await
    }
}
