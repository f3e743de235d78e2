//! Per-agent projection of challenges.
//!
//! The view contract returns zero-padded id arrays per status bucket; each
//! surviving id costs one more read through [`Challenges`]. N is bounded by
//! one agent's live challenges.

use ac_02_contract_gateway::{
    ContractEnvironment, ContractError, SolidityContract,
};
use shared_types::{inflate_challenge_ids, AgentId, Challenge, ChallengeId, EthereumAddress};

use crate::challenges::Challenges;
use crate::support::{parse_receipt, uint};

#[derive(Debug, Clone)]
pub struct AgentChallengesView {
    contract: SolidityContract,
    challenges: Challenges,
}

impl AgentChallengesView {
    pub const NAME: &'static str = "AgentChallengesView";

    pub fn at(
        env: &ContractEnvironment,
        address: EthereumAddress,
        challenges: Challenges,
    ) -> Result<Self, ContractError> {
        Ok(Self {
            contract: SolidityContract::new(env, Self::NAME, address)?,
            challenges,
        })
    }

    pub fn contract(&self) -> &SolidityContract {
        &self.contract
    }

    pub fn address(&self) -> &EthereumAddress {
        self.contract.address()
    }

    pub async fn authorized_challenges_for_agent(
        &self,
        agent: AgentId,
    ) -> Result<Vec<Challenge>, ContractError> {
        let mut authorized = Vec::new();
        for id in self.ids(agent, "authorizedChallengeIdsForAgent").await? {
            authorized.push(self.challenges.get_authorized(id).await?);
        }
        Ok(authorized)
    }

    pub async fn denied_challenges_for_agent(
        &self,
        agent: AgentId,
    ) -> Result<Vec<Challenge>, ContractError> {
        let mut denied = Vec::new();
        for id in self.ids(agent, "deniedChallengeIdsForAgent").await? {
            denied.push(self.challenges.get_denied(id).await?);
        }
        Ok(denied)
    }

    pub async fn pending_challenges_for_agent(
        &self,
        agent: AgentId,
    ) -> Result<Vec<Challenge>, ContractError> {
        let mut pending = Vec::new();
        for id in self.ids(agent, "pendingChallengeIdsForAgent").await? {
            pending.push(self.challenges.get_pending(id).await?);
        }
        Ok(pending)
    }

    pub async fn destroy(&self) -> Result<(), ContractError> {
        self.contract.destroy().await
    }

    async fn ids(&self, agent: AgentId, method: &str) -> Result<Vec<ChallengeId>, ContractError> {
        self.contract
            .call(method, vec![uint(agent.value())], |value| {
                let raw: Vec<String> = parse_receipt(value)?;
                Ok(inflate_challenge_ids(&raw)?)
            })
            .await
    }
}
