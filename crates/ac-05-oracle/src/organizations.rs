//! Startup mapping from organization id to its contract.
//!
//! Built once, sequentially, for ids `1..=lastOrganizationId`, and read-only
//! afterwards. Any failed lookup aborts the whole load.

use std::collections::BTreeMap;

use ac_01_web3_transport::U256;
use ac_02_contract_gateway::{ContractEnvironment, Facade};
use ac_03_contract_facades::{
    AgentChallengesView, Challenges, DomainNameSystem, Organization, Organizations,
};
use shared_types::{DomainName, OrganizationId};
use tracing::{debug, info};

use crate::errors::OracleError;

#[derive(Debug, Clone, Default)]
pub struct OrganizationDirectory {
    organizations: BTreeMap<OrganizationId, Organization>,
}

impl OrganizationDirectory {
    /// Resolve the `Organizations` registry through DNS and load every entry.
    pub async fn load(
        dns: &DomainNameSystem,
        env: &ContractEnvironment,
    ) -> Result<Self, OracleError> {
        let address = dns.lookup(&DomainName::of(Organizations::NAME)?).await?;
        let registry = Organizations::at(env, address)?;
        let highest = registry.last_organization_id().await?;
        info!(highest = %highest, "Loading organizations");

        let mut organizations = BTreeMap::new();
        let mut next = U256::from(1u64);
        while next <= highest.value() {
            let id = OrganizationId::of(next);
            let address = registry
                .get(id)
                .await
                .map_err(|source| OracleError::OrganizationLoad {
                    id: id.to_string(),
                    source,
                })?;
            debug!(id = %id, address = %address, "Organization loaded");
            organizations.insert(id, Organization::at(env, address)?);
            next += U256::from(1u64);
        }

        Ok(Self { organizations })
    }

    pub fn get(&self, id: OrganizationId) -> Option<&Organization> {
        self.organizations.get(&id)
    }

    pub fn len(&self) -> usize {
        self.organizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = OrganizationId> + '_ {
        self.organizations.keys().copied()
    }

    /// Each organization's agent-challenges view, wired to its challenges
    /// contract.
    pub async fn load_agent_challenge_views(
        &self,
        env: &ContractEnvironment,
    ) -> Result<BTreeMap<OrganizationId, AgentChallengesView>, OracleError> {
        let mut views = BTreeMap::new();
        for (id, organization) in &self.organizations {
            let view = organization.agent_challenges_view_address().await?;
            let challenges = Challenges::at(env, organization.challenges_address().await?)?;
            views.insert(*id, AgentChallengesView::at(env, view, challenges)?);
        }
        info!(count = views.len(), "Agent challenge views loaded");
        Ok(views)
    }
}
