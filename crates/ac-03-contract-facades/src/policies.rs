use ac_01_web3_transport::abi::{uint256, uint8};
use ac_01_web3_transport::DynSolValue;
use ac_02_contract_gateway::{ContractError, ContractInteractionError, Facade};
use serde_json::{json, Value};
use shared_types::{
    ActionId, AgentId, ChallengeId, ChallengeMessage, ChallengeTitle, EthereumAddress,
    OrganizationId, PolicyId,
};

use crate::support::{account, address, decimal, text, uint};

facade! {
    /// A single approval policy: which agents must answer, and how many.
    Policy
}

impl Policy {
    pub async fn init(
        &self,
        organization: OrganizationId,
        policy: PolicyId,
    ) -> Result<(), ContractError> {
        self.contract
            .send(
                "init",
                vec![uint(organization.value()), uint(policy.value())],
                |_| {
                    self.contract.log_contract(
                        "init",
                        json!({
                            "policyId": policy.to_string(),
                            "organizationId": organization.to_string(),
                        }),
                    );
                    Ok(())
                },
            )
            .await
    }

    /// Configure the challenge sent to each approver.
    pub async fn init_challenge(
        &self,
        title: &ChallengeTitle,
        message: &ChallengeMessage,
        approvers: &[AgentId],
        approvals_required: u8,
        timeout_seconds: u64,
    ) -> Result<(), ContractError> {
        let args = vec![
            text(title.value()),
            text(message.value()),
            DynSolValue::Array(approvers.iter().map(|a| uint(a.value())).collect()),
            uint8(approvals_required),
            uint256(timeout_seconds),
        ];
        self.contract
            .send("initChallenge", args, |_| {
                self.contract.log_contract(
                    "init challenge",
                    json!({
                        "challengeTitle": title.value(),
                        "challengeMessage": message.value(),
                        "approvers": approvers.iter().map(ToString::to_string).collect::<Vec<_>>(),
                        "approvalsRequired": approvals_required,
                        "timeout": timeout_seconds,
                    }),
                );
                Ok(())
            })
            .await
    }

    pub async fn start_authorization(&self) -> Result<(), ContractError> {
        self.contract
            .send("startAuthorization", Vec::new(), |_| {
                self.contract
                    .log_contract("started authorization", Value::Null);
                Ok(())
            })
            .await
    }

    pub async fn challenge_response(
        &self,
        action: ActionId,
        challenge: ChallengeId,
        approved: bool,
    ) -> Result<(), ContractError> {
        let args = vec![uint(action.value()), uint(challenge.value()), approved.into()];
        self.contract
            .send("challengeResponse", args, |_| {
                self.contract.log_contract(
                    "processed challenge response",
                    json!({
                        "challengeId": challenge.to_string(),
                        "actionId": action.to_string(),
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

    pub async fn policy_id(&self) -> Result<PolicyId, ContractError> {
        self.contract
            .call("getPolicyId", Vec::new(), |value| {
                Ok(PolicyId::parse(&decimal(value)?)?)
            })
            .await
    }
}

facade! {
    /// Registry of policy contracts.
    Policies
}

impl Policies {
    pub async fn add(
        &self,
        policy: &EthereumAddress,
        organization: OrganizationId,
    ) -> Result<(), ContractError> {
        self.contract
            .send(
                "add",
                vec![address(policy), uint(organization.value())],
                |_| {
                    self.contract.log_contract(
                        "added and initialized Policy",
                        json!({
                            "address": policy.value(),
                            "organizationId": organization.to_string(),
                        }),
                    );
                    Ok(())
                },
            )
            .await
    }

    pub async fn get(&self, id: PolicyId) -> Result<EthereumAddress, ContractError> {
        self.contract
            .call("get", vec![uint(id.value())], |value| {
                let policy = account(value)?;
                if policy.is_unknown() {
                    return Err(ContractInteractionError::not_found(Self::NAME, "get", id).into());
                }
                Ok(policy)
            })
            .await
    }

    pub async fn remove(&self, id: PolicyId) -> Result<(), ContractError> {
        self.contract
            .send("remove", vec![uint(id.value())], |_| {
                self.contract
                    .log_contract("removed", json!({"id": id.to_string()}));
                Ok(())
            })
            .await
    }

    pub async fn last_policy_id(&self) -> Result<PolicyId, ContractError> {
        self.contract
            .call("lastPolicyId", Vec::new(), |value| {
                Ok(PolicyId::parse(&decimal(value)?)?)
            })
            .await
    }

    pub async fn authorize(&self, policy: PolicyId) -> Result<(), ContractError> {
        self.contract
            .send("authorize", vec![uint(policy.value())], |_| {
                self.contract
                    .log_contract("authorize on Policy", json!({"id": policy.to_string()}));
                Ok(())
            })
            .await
    }

    /// The policy id is only logged; the contract routes by action.
    pub async fn challenge_response(
        &self,
        policy: PolicyId,
        action: ActionId,
        challenge: ChallengeId,
        approved: bool,
    ) -> Result<(), ContractError> {
        let args = vec![uint(action.value()), uint(challenge.value()), approved.into()];
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
}
