//! Shared fixtures: a fully wired deployment on a fresh [`MockChain`].

use std::sync::Arc;
use std::time::Duration;

use ac_02_contract_gateway::{
    deploy_contract, deploy_facade, ContractEnvironment, DynSolValue, Facade, GatewaySettings,
};
use ac_01_web3_transport::Address;
use ac_03_contract_facades::{
    AccessControl, Actions, Challenger, Challenges, DomainNameSystem, Organization, Organizations,
};
use shared_types::{
    ActionId, AgentId, ChallengeMessage, ChallengeTitle, DeviceId, DeviceToken, DomainName,
    EthereumAddress, OrganizationId, PolicyId,
};

use crate::chain::{abi, ChainConnection, MockChain};

// =============================================================================
// TEST FIXTURES
// =============================================================================

pub const ORGANIZATION: u64 = 121;
pub const POLICY: u64 = 55;
pub const AGENT: u64 = 22;
pub const ACTION: u64 = 4;
pub const DEVICE: u64 = 300;
pub const TOKEN: &str = "sdasdasdasoooo";
pub const TITLE: &str = "A very important title";
pub const MESSAGE: &str = "Super secret message";

pub fn organization_id() -> OrganizationId {
    OrganizationId::from(ORGANIZATION)
}

pub fn policy_id() -> PolicyId {
    PolicyId::from(POLICY)
}

pub fn agent_id() -> AgentId {
    AgentId::from(AGENT)
}

pub fn action_id() -> ActionId {
    ActionId::from(ACTION)
}

pub fn device_id() -> DeviceId {
    DeviceId::from(DEVICE)
}

pub fn token() -> DeviceToken {
    DeviceToken::of(TOKEN).unwrap()
}

pub fn title() -> ChallengeTitle {
    ChallengeTitle::of(TITLE).unwrap()
}

pub fn message() -> ChallengeMessage {
    ChallengeMessage::of(MESSAGE).unwrap()
}

pub fn domain(name: &str) -> DomainName {
    DomainName::of(name).unwrap()
}

/// The account every fixture environment signs with.
pub fn sender() -> EthereumAddress {
    EthereumAddress::from_address(Address::with_last_byte(0xf1))
}

/// An account holding no role anywhere.
pub fn stranger() -> EthereumAddress {
    EthereumAddress::from_address(Address::left_padding_from(&[0x0b, 0xad]))
}

pub fn address_token(address: &EthereumAddress) -> DynSolValue {
    DynSolValue::Address(address.to_address())
}

pub fn environment(chain: &Arc<MockChain>) -> ContractEnvironment {
    environment_as(chain, sender())
}

pub fn environment_as(chain: &Arc<MockChain>, sender: EthereumAddress) -> ContractEnvironment {
    ContractEnvironment::new(
        Arc::new(ChainConnection(chain.clone())),
        sender,
        Arc::new(abi::sources()),
        GatewaySettings {
            receipt_poll_interval_ms: 1,
            ..GatewaySettings::default()
        },
    )
}

// =============================================================================
// DEPLOYMENT
// =============================================================================

/// Every contract of one installation, wired the way a migration wires them.
pub struct Deployment {
    pub access: AccessControl,
    pub challenger: Challenger,
    pub challenges: Challenges,
    pub actions: Actions,
    pub dns: DomainNameSystem,
    pub organizations: Organizations,
    pub organization: Organization,
    pub view: EthereumAddress,
}

pub async fn deploy(env: &ContractEnvironment) -> Deployment {
    let access: AccessControl = deploy_facade(env, Vec::new()).await.unwrap();
    let access_arg = address_token(access.address());

    let challenger: Challenger = deploy_facade(env, vec![access_arg.clone()]).await.unwrap();
    let challenges: Challenges = deploy_facade(
        env,
        vec![access_arg.clone(), address_token(challenger.address())],
    )
    .await
    .unwrap();
    access.add_admin(challenges.address()).await.unwrap();

    let actions: Actions = deploy_facade(
        env,
        vec![access_arg.clone(), address_token(challenges.address())],
    )
    .await
    .unwrap();
    access.add_admin(actions.address()).await.unwrap();

    let dns: DomainNameSystem = deploy_facade(env, vec![access_arg.clone()]).await.unwrap();
    let organizations: Organizations = deploy_facade(env, vec![access_arg]).await.unwrap();

    let view = deploy_contract(
        env,
        "AgentChallengesView",
        vec![address_token(challenges.address())],
    )
    .await
    .unwrap();
    let organization_address = deploy_contract(
        env,
        Organization::NAME,
        vec![address_token(challenges.address()), address_token(&view)],
    )
    .await
    .unwrap();
    let organization = Organization::at(env, organization_address.clone()).unwrap();
    organizations.add(&organization_address).await.unwrap();

    dns.update(&domain(Organizations::NAME), organizations.address())
        .await
        .unwrap();
    dns.update(&domain(Challenger::NAME), challenger.address())
        .await
        .unwrap();
    dns.update(&domain(Challenges::NAME), challenges.address())
        .await
        .unwrap();

    Deployment {
        access,
        challenger,
        challenges,
        actions,
        dns,
        organizations,
        organization,
        view,
    }
}

impl Deployment {
    /// Raise one pending challenge with the fixture values.
    pub async fn create_pending_challenge(&self) {
        self.challenges
            .create_pending(
                organization_id(),
                policy_id(),
                agent_id(),
                action_id(),
                device_id(),
                &token(),
                &title(),
                &message(),
            )
            .await
            .unwrap();
    }
}

// =============================================================================
// WAITING
// =============================================================================

/// Poll `condition` until it holds; panics after two seconds.
pub async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

/// Receive the next value or panic after five seconds.
pub async fn received<T>(rx: &mut tokio::sync::mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("nothing received in time")
        .expect("channel closed")
}
