use ac_02_contract_gateway::{ContractError, ContractInteractionError, Facade};
use serde_json::json;
use shared_types::{
    Action, ActionId, AgentId, ChallengeId, ChallengeMessage, ChallengeTitle, DeviceId,
    DeviceToken, OrganizationId, PolicyId,
};

use crate::receipts::{is_sentinel, ActionReceipt};
use crate::support::{decimal, parse_receipt, text, uint};

facade! {
    /// Actions awaiting, or resolved by, policy authorization.
    Actions
}

impl Actions {
    pub async fn create_pending(&self, policy: PolicyId) -> Result<(), ContractError> {
        self.contract
            .send("createPending", vec![uint(policy.value())], |_| {
                self.contract
                    .log_contract("created Action for Policy", json!({"id": policy.to_string()}));
                Ok(())
            })
            .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_pending_challenge(
        &self,
        organization: OrganizationId,
        policy: PolicyId,
        action: ActionId,
        agent: AgentId,
        device: DeviceId,
        token: &DeviceToken,
        title: &ChallengeTitle,
        message: &ChallengeMessage,
    ) -> Result<(), ContractError> {
        let args = vec![
            uint(organization.value()),
            uint(policy.value()),
            uint(action.value()),
            uint(agent.value()),
            uint(device.value()),
            text(token.value()),
            text(title.value()),
            text(message.value()),
        ];
        self.contract
            .send("createPendingChallenge", args, |_| {
                self.contract.log_contract(
                    "created Pending Challenge",
                    json!({
                        "organizationId": organization.to_string(),
                        "policyId": policy.to_string(),
                        "actionId": action.to_string(),
                        "agentId": agent.to_string(),
                        "deviceId": device.to_string(),
                        "deviceToken": token.value(),
                    }),
                );
                Ok(())
            })
            .await
    }

    pub async fn last_action_id(&self) -> Result<ActionId, ContractError> {
        self.contract
            .call("lastActionId", Vec::new(), |value| {
                Ok(ActionId::parse(&decimal(value)?)?)
            })
            .await
    }

    pub async fn get_pending(&self, id: ActionId) -> Result<Action, ContractError> {
        self.get("getPending", id, ActionReceipt::inflate_pending)
            .await
    }

    pub async fn get_authorized(&self, id: ActionId) -> Result<Action, ContractError> {
        self.get("getAuthorized", id, ActionReceipt::inflate_authorized)
            .await
    }

    pub async fn get_denied(&self, id: ActionId) -> Result<Action, ContractError> {
        self.get("getDenied", id, ActionReceipt::inflate_denied)
            .await
    }

    pub async fn remove(&self, id: ActionId) -> Result<(), ContractError> {
        self.transition("remove", "removed", id).await
    }

    pub async fn authorize(&self, id: ActionId) -> Result<(), ContractError> {
        self.transition("authorize", "authorized", id).await
    }

    pub async fn deny(&self, id: ActionId) -> Result<(), ContractError> {
        self.transition("deny", "denied", id).await
    }

    pub async fn authorize_pending_challenge(
        &self,
        id: ActionId,
        challenge: ChallengeId,
    ) -> Result<(), ContractError> {
        self.resolve_challenge("authorizePendingChallenge", "Authorized", id, challenge)
            .await
    }

    pub async fn deny_pending_challenge(
        &self,
        id: ActionId,
        challenge: ChallengeId,
    ) -> Result<(), ContractError> {
        self.resolve_challenge("denyPendingChallenge", "Denied", id, challenge)
            .await
    }

    async fn get(
        &self,
        method: &str,
        id: ActionId,
        inflate: fn(&ActionReceipt) -> Result<Action, shared_types::ValidationError>,
    ) -> Result<Action, ContractError> {
        self.contract
            .call(method, vec![uint(id.value())], |value| {
                let receipt: ActionReceipt = parse_receipt(value)?;
                if is_sentinel(&receipt.id) {
                    return Err(ContractInteractionError::not_found(Self::NAME, method, id).into());
                }
                Ok(inflate(&receipt)?)
            })
            .await
    }

    async fn transition(
        &self,
        method: &str,
        transition: &str,
        id: ActionId,
    ) -> Result<(), ContractError> {
        self.contract
            .send(method, vec![uint(id.value())], |_| {
                self.contract.log_contract(
                    "transitioned Action",
                    json!({"id": id.to_string(), "transition": transition}),
                );
                Ok(())
            })
            .await
    }

    async fn resolve_challenge(
        &self,
        method: &str,
        kind: &str,
        id: ActionId,
        challenge: ChallengeId,
    ) -> Result<(), ContractError> {
        self.contract
            .send(
                method,
                vec![uint(id.value()), uint(challenge.value())],
                |_| {
                    self.contract.log_contract(
                        &format!("added {} Challenge", kind),
                        json!({"id": id.to_string(), "challengeId": challenge.to_string()}),
                    );
                    Ok(())
                },
            )
            .await
    }
}
