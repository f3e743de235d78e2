use ac_02_contract_gateway::{ContractError, ContractInteractionError, Facade};
use serde_json::json;
use shared_types::{
    ActionId, AgentId, Challenge, ChallengeId, ChallengeMessage, ChallengeTitle, DeviceId,
    DeviceToken, OrganizationId, PolicyId, ValidationError,
};

use crate::receipts::{is_sentinel, ChallengeReceipt};
use crate::support::{decimal, parse_receipt, text, uint};

facade! {
    /// Challenges issued to agent devices and their resolution.
    Challenges
}

impl Challenges {
    #[allow(clippy::too_many_arguments)]
    pub async fn create_pending(
        &self,
        organization: OrganizationId,
        policy: PolicyId,
        agent: AgentId,
        action: ActionId,
        device: DeviceId,
        token: &DeviceToken,
        title: &ChallengeTitle,
        message: &ChallengeMessage,
    ) -> Result<(), ContractError> {
        let args = vec![
            uint(organization.value()),
            uint(policy.value()),
            uint(agent.value()),
            uint(action.value()),
            uint(device.value()),
            text(token.value()),
            text(title.value()),
            text(message.value()),
        ];
        self.contract
            .send("createPending", args, |_| {
                self.contract.log_contract(
                    "created Challenge",
                    json!({
                        "organizationId": organization.to_string(),
                        "policyId": policy.to_string(),
                        "actionId": action.to_string(),
                        "agentId": agent.to_string(),
                        "deviceId": device.to_string(),
                        "deviceToken": token.value(),
                        "challengeTitle": title.value(),
                        "challengeMessage": message.value(),
                    }),
                );
                Ok(())
            })
            .await
    }

    pub async fn last_challenge_id(&self) -> Result<ChallengeId, ContractError> {
        self.contract
            .call("lastChallengeId", Vec::new(), |value| {
                Ok(ChallengeId::parse(&decimal(value)?)?)
            })
            .await
    }

    pub async fn get_pending(&self, id: ChallengeId) -> Result<Challenge, ContractError> {
        self.get("getPending", id, ChallengeReceipt::inflate_pending)
            .await
    }

    pub async fn get_authorized(&self, id: ChallengeId) -> Result<Challenge, ContractError> {
        self.get("getAuthorized", id, ChallengeReceipt::inflate_authorized)
            .await
    }

    pub async fn get_denied(&self, id: ChallengeId) -> Result<Challenge, ContractError> {
        self.get("getDenied", id, ChallengeReceipt::inflate_denied)
            .await
    }

    pub async fn remove(&self, id: ChallengeId) -> Result<(), ContractError> {
        self.transition("remove", "removed", id).await
    }

    pub async fn authorize(&self, id: ChallengeId) -> Result<(), ContractError> {
        self.transition("authorize", "authorized", id).await
    }

    pub async fn deny(&self, id: ChallengeId) -> Result<(), ContractError> {
        self.transition("deny", "denied", id).await
    }

    async fn get(
        &self,
        method: &str,
        id: ChallengeId,
        inflate: fn(&ChallengeReceipt) -> Result<Challenge, ValidationError>,
    ) -> Result<Challenge, ContractError> {
        self.contract
            .call(method, vec![uint(id.value())], |value| {
                let receipt: ChallengeReceipt = parse_receipt(value)?;
                if is_sentinel(&receipt.challenge_id) {
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
        id: ChallengeId,
    ) -> Result<(), ContractError> {
        self.contract
            .send(method, vec![uint(id.value())], |_| {
                self.contract.log_contract(
                    "transitioned Challenge",
                    json!({"id": id.to_string(), "transition": transition}),
                );
                Ok(())
            })
            .await
    }
}

facade! {
    /// Announces challenges to devices through its `issueChallenge` event.
    Challenger
}

impl Challenger {
    #[allow(clippy::too_many_arguments)]
    pub async fn issue(
        &self,
        organization: OrganizationId,
        policy: PolicyId,
        action: ActionId,
        device: DeviceId,
        token: &DeviceToken,
        id: ChallengeId,
        title: &ChallengeTitle,
        message: &ChallengeMessage,
    ) -> Result<(), ContractError> {
        let args = vec![
            uint(organization.value()),
            uint(policy.value()),
            uint(action.value()),
            uint(device.value()),
            text(token.value()),
            uint(id.value()),
            text(title.value()),
            text(message.value()),
        ];
        self.contract
            .send("issue", args, |_| {
                self.contract.log_contract(
                    "issued Challenge",
                    json!({
                        "organizationId": organization.to_string(),
                        "policyId": policy.to_string(),
                        "actionId": action.to_string(),
                        "deviceId": device.to_string(),
                        "deviceToken": token.value(),
                        "challengeId": id.to_string(),
                        "challengeTitle": title.value(),
                        "challengeMessage": message.value(),
                    }),
                );
                Ok(())
            })
            .await
    }
}
