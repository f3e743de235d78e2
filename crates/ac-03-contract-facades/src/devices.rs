use ac_02_contract_gateway::{ContractError, ContractInteractionError, Facade};
use serde_json::json;
use shared_types::{AgentId, Device, DeviceId, DeviceName, DeviceToken, ObsoleteDeviceReason};

use crate::receipts::{is_sentinel, DeviceReceipt};
use crate::support::{decimal, parse_receipt, text, uint};

facade! {
    /// Registry of agent devices and the tokens used to reach them.
    Devices
}

impl Devices {
    pub async fn create(
        &self,
        agent: AgentId,
        name: &DeviceName,
        token: &DeviceToken,
    ) -> Result<(), ContractError> {
        self.contract
            .send(
                "create",
                vec![uint(agent.value()), text(name.value()), text(token.value())],
                |_| {
                    self.contract.log_contract(
                        "created Device",
                        json!({
                            "id": agent.to_string(),
                            "name": name.value(),
                            "token": token.value(),
                        }),
                    );
                    Ok(())
                },
            )
            .await
    }

    pub async fn last_device_id(&self) -> Result<DeviceId, ContractError> {
        self.contract
            .call("lastDeviceId", Vec::new(), |value| {
                Ok(DeviceId::parse(&decimal(value)?)?)
            })
            .await
    }

    /// Every live device of `agent`; zero padding is dropped.
    pub async fn agent_devices(&self, agent: AgentId) -> Result<Vec<Device>, ContractError> {
        self.contract
            .call("agentDevices", vec![uint(agent.value())], |value| {
                let receipts: Vec<DeviceReceipt> = parse_receipt(value)?;
                receipts
                    .iter()
                    .filter(|receipt| !is_sentinel(&receipt.device_id))
                    .map(|receipt| receipt.inflate().map_err(ContractError::from))
                    .collect()
            })
            .await
    }

    pub async fn get(&self, id: DeviceId) -> Result<Device, ContractError> {
        self.contract
            .call("get", vec![uint(id.value())], |value| {
                let receipt: DeviceReceipt = parse_receipt(value)?;
                if is_sentinel(&receipt.device_id) {
                    return Err(ContractInteractionError::not_found(Self::NAME, "get", id).into());
                }
                Ok(receipt.inflate()?)
            })
            .await
    }

    pub async fn get_obsolete(&self, id: DeviceId) -> Result<Device, ContractError> {
        self.contract
            .call("getObsolete", vec![uint(id.value())], |value| {
                let receipt: DeviceReceipt = parse_receipt(value)?;
                if is_sentinel(&receipt.device_id) {
                    return Err(
                        ContractInteractionError::not_found(Self::NAME, "getObsolete", id).into(),
                    );
                }
                Ok(receipt.inflate_obsolete()?)
            })
            .await
    }

    pub async fn obsolete(
        &self,
        id: DeviceId,
        reason: &ObsoleteDeviceReason,
    ) -> Result<(), ContractError> {
        self.contract
            .send(
                "obsolete",
                vec![uint(id.value()), text(reason.value())],
                |_| {
                    self.contract.log_contract(
                        "obsoleted Device",
                        json!({"id": id.to_string(), "reason": reason.value()}),
                    );
                    Ok(())
                },
            )
            .await
    }

    pub async fn remove_obsolete(&self, id: DeviceId) -> Result<(), ContractError> {
        self.contract
            .send("removeObsolete", vec![uint(id.value())], |_| {
                self.contract
                    .log_contract("removed obsolete Device", json!({"id": id.to_string()}));
                Ok(())
            })
            .await
    }
}
