use ac_01_web3_transport::abi::uint8;
use ac_01_web3_transport::DynSolValue;
use ac_02_contract_gateway::ContractError;
use serde_json::json;
use shared_types::EthereumAddress;

use crate::support::{address, parse_receipt};

/// Access tiers understood by the access-control contract, in on-chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Role {
    Uninitialized = 0,
    Owner = 1,
    Admin = 2,
    User = 3,
}

impl From<Role> for DynSolValue {
    fn from(role: Role) -> Self {
        uint8(role as u8)
    }
}

facade! {
    /// Owner, admin and user membership shared by the other contracts.
    AccessControl
}

impl AccessControl {
    pub async fn add_owner(&self, owner: &EthereumAddress) -> Result<(), ContractError> {
        self.membership("addOwner", "added owner", owner).await
    }

    pub async fn add_admin(&self, admin: &EthereumAddress) -> Result<(), ContractError> {
        self.membership("addAdmin", "added admin", admin).await
    }

    pub async fn add_user(&self, user: &EthereumAddress) -> Result<(), ContractError> {
        self.membership("addUser", "added user", user).await
    }

    pub async fn remove_owner(&self, owner: &EthereumAddress) -> Result<(), ContractError> {
        self.membership("removeOwner", "removed owner", owner).await
    }

    pub async fn remove_admin(&self, admin: &EthereumAddress) -> Result<(), ContractError> {
        self.membership("removeAdmin", "removed admin", admin).await
    }

    pub async fn remove_user(&self, user: &EthereumAddress) -> Result<(), ContractError> {
        self.membership("removeUser", "removed user", user).await
    }

    pub async fn owners(&self) -> Result<Vec<EthereumAddress>, ContractError> {
        self.addresses("getOwners").await
    }

    pub async fn admins(&self) -> Result<Vec<EthereumAddress>, ContractError> {
        self.addresses("getAdmins").await
    }

    pub async fn users(&self) -> Result<Vec<EthereumAddress>, ContractError> {
        self.addresses("getUsers").await
    }

    /// Succeeds only when the sender holds `role`; the contract reverts otherwise.
    pub async fn sender_requires(&self, role: Role) -> Result<(), ContractError> {
        self.contract
            .call("senderRequires", vec![role.into()], |_| Ok(()))
            .await
    }

    async fn membership(
        &self,
        method: &str,
        description: &str,
        member: &EthereumAddress,
    ) -> Result<(), ContractError> {
        self.contract
            .send(method, vec![address(member)], |_| {
                self.contract
                    .log_contract(description, json!({"address": member.value()}));
                Ok(())
            })
            .await
    }

    async fn addresses(&self, method: &str) -> Result<Vec<EthereumAddress>, ContractError> {
        self.contract
            .call(method, Vec::new(), |value| {
                let raw: Vec<String> = parse_receipt(value)?;
                raw.into_iter()
                    .map(|a| EthereumAddress::of(a).map_err(ContractError::from))
                    .collect()
            })
            .await
    }
}
