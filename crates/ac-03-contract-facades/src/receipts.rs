//! Loosely-typed chain receipts and their inflation into aggregates.
//!
//! Contracts return stringified integers and plain strings. Each receipt
//! mirrors one on-chain struct (camelCase field names) and inflates into a
//! validated record. Facades check the primary identifier for the zero
//! sentinel before inflating; event payloads are inflated directly.

use serde::Deserialize;
use shared_types::{
    inflate_challenge_ids, Action, ActionDetails, ActionId, Agent, AgentId, AgentName,
    AgentUsername, Challenge, ChallengeDetails, ChallengeId, ChallengeMessage, ChallengeTitle,
    Device, DeviceDetails, DeviceId, DeviceName, DeviceStatus, DeviceToken, IssuedChallenge,
    ObsoleteDeviceReason, OrganizationId, PolicyId, Resolution, Timestamp, ValidationError,
};

/// The zero sentinel as the chain renders it.
pub fn is_sentinel(raw: &str) -> bool {
    raw.trim() == "0"
}

fn nested<T>(field: &str, result: Result<T, ValidationError>) -> Result<T, ValidationError> {
    result.map_err(|e| e.nested(field))
}

fn required<'a>(field: &str, raw: &'a Option<String>) -> Result<&'a str, ValidationError> {
    raw.as_deref()
        .ok_or_else(|| ValidationError::single("", field, "should not be empty"))
}

// =============================================================================
// AGENT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReceipt {
    pub id: String,
    pub name: String,
    pub username: String,
    pub creation_date: String,
}

impl AgentReceipt {
    pub fn inflate(&self) -> Result<Agent, ValidationError> {
        Agent::new(
            nested("id", AgentId::parse(&self.id))?,
            nested("name", AgentName::of(self.name.as_str()))?,
            nested("username", AgentUsername::of(self.username.as_str()))?,
            nested("creationDate", Timestamp::parse(&self.creation_date))?,
        )
    }
}

// =============================================================================
// DEVICE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReceipt {
    pub device_id: String,
    pub agent_id: String,
    pub device_name: String,
    pub token: String,
    pub creation_date: String,
    #[serde(default)]
    pub obsolete_reason: Option<String>,
    #[serde(default)]
    pub obsolete_date: Option<String>,
}

impl DeviceReceipt {
    fn details(&self) -> Result<DeviceDetails, ValidationError> {
        Ok(DeviceDetails {
            id: nested("deviceId", DeviceId::parse(&self.device_id))?,
            agent_id: nested("agentId", AgentId::parse(&self.agent_id))?,
            name: nested("deviceName", DeviceName::of(self.device_name.as_str()))?,
            token: nested("token", DeviceToken::of(self.token.as_str()))?,
            creation_date: nested("creationDate", Timestamp::parse(&self.creation_date))?,
        })
    }

    pub fn inflate(&self) -> Result<Device, ValidationError> {
        Device::new(self.details()?, DeviceStatus::Active)
    }

    pub fn inflate_obsolete(&self) -> Result<Device, ValidationError> {
        let reason = required("obsoleteReason", &self.obsolete_reason)?;
        let date = required("obsoleteDate", &self.obsolete_date)?;
        Device::new(
            self.details()?,
            DeviceStatus::Obsolete {
                reason: nested("obsoleteReason", ObsoleteDeviceReason::of(reason))?,
                obsolete_date: nested("obsoleteDate", Timestamp::parse(date))?,
            },
        )
    }
}

// =============================================================================
// CHALLENGE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeReceipt {
    pub policy_id: String,
    pub action_id: String,
    pub agent_id: String,
    pub device_id: String,
    pub device_token: String,
    pub challenge_id: String,
    pub challenge_title: String,
    pub challenge_message: String,
    pub emit_date: String,
    #[serde(default)]
    pub authorized_date: Option<String>,
    #[serde(default)]
    pub denied_date: Option<String>,
}

impl ChallengeReceipt {
    fn details(&self) -> Result<ChallengeDetails, ValidationError> {
        Ok(ChallengeDetails {
            id: nested("challengeId", ChallengeId::parse(&self.challenge_id))?,
            policy_id: nested("policyId", PolicyId::parse(&self.policy_id))?,
            action_id: nested("actionId", ActionId::parse(&self.action_id))?,
            agent_id: nested("agentId", AgentId::parse(&self.agent_id))?,
            device_id: nested("deviceId", DeviceId::parse(&self.device_id))?,
            device_token: nested("deviceToken", DeviceToken::of(self.device_token.as_str()))?,
            title: nested("challengeTitle", ChallengeTitle::of(self.challenge_title.as_str()))?,
            message: nested(
                "challengeMessage",
                ChallengeMessage::of(self.challenge_message.as_str()),
            )?,
            emit_date: nested("emitDate", Timestamp::parse(&self.emit_date))?,
        })
    }

    pub fn inflate_pending(&self) -> Result<Challenge, ValidationError> {
        Challenge::new(self.details()?, Resolution::Pending)
    }

    pub fn inflate_authorized(&self) -> Result<Challenge, ValidationError> {
        let date = required("authorizedDate", &self.authorized_date)?;
        Challenge::new(
            self.details()?,
            Resolution::Authorized {
                authorized_date: nested("authorizedDate", Timestamp::parse(date))?,
            },
        )
    }

    pub fn inflate_denied(&self) -> Result<Challenge, ValidationError> {
        let date = required("deniedDate", &self.denied_date)?;
        Challenge::new(
            self.details()?,
            Resolution::Denied {
                denied_date: nested("deniedDate", Timestamp::parse(date))?,
            },
        )
    }
}

// =============================================================================
// ACTION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReceipt {
    pub id: String,
    pub policy_id: String,
    pub authorized_challenges: Vec<String>,
    pub denied_challenges: Vec<String>,
    pub pending_challenges: Vec<String>,
    pub request_date: String,
    #[serde(default)]
    pub authorized_date: Option<String>,
    #[serde(default)]
    pub denied_date: Option<String>,
}

impl ActionReceipt {
    fn details(&self) -> Result<ActionDetails, ValidationError> {
        Ok(ActionDetails {
            id: nested("id", ActionId::parse(&self.id))?,
            policy_id: nested("policyId", PolicyId::parse(&self.policy_id))?,
            authorized_challenges: nested(
                "authorizedChallenges",
                inflate_challenge_ids(&self.authorized_challenges),
            )?,
            denied_challenges: nested(
                "deniedChallenges",
                inflate_challenge_ids(&self.denied_challenges),
            )?,
            pending_challenges: nested(
                "pendingChallenges",
                inflate_challenge_ids(&self.pending_challenges),
            )?,
            request_date: nested("requestDate", Timestamp::parse(&self.request_date))?,
        })
    }

    pub fn inflate_pending(&self) -> Result<Action, ValidationError> {
        Action::new(self.details()?, Resolution::Pending)
    }

    pub fn inflate_authorized(&self) -> Result<Action, ValidationError> {
        let date = required("authorizedDate", &self.authorized_date)?;
        Action::new(
            self.details()?,
            Resolution::Authorized {
                authorized_date: nested("authorizedDate", Timestamp::parse(date))?,
            },
        )
    }

    pub fn inflate_denied(&self) -> Result<Action, ValidationError> {
        let date = required("deniedDate", &self.denied_date)?;
        Action::new(
            self.details()?,
            Resolution::Denied {
                denied_date: nested("deniedDate", Timestamp::parse(date))?,
            },
        )
    }
}

// =============================================================================
// ISSUED CHALLENGE
// =============================================================================

/// Flat payload of the challenger's `issueChallenge` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedChallengeReceipt {
    pub organization_id: String,
    pub policy_id: String,
    pub action_id: String,
    pub device_id: String,
    pub device_token: String,
    pub challenge_id: String,
    pub challenge_title: String,
    pub challenge_message: String,
}

impl IssuedChallengeReceipt {
    pub fn inflate(&self) -> Result<IssuedChallenge, ValidationError> {
        Ok(IssuedChallenge {
            organization_id: nested(
                "organizationId",
                OrganizationId::parse(&self.organization_id),
            )?,
            policy_id: nested("policyId", PolicyId::parse(&self.policy_id))?,
            action_id: nested("actionId", ActionId::parse(&self.action_id))?,
            device_id: nested("deviceId", DeviceId::parse(&self.device_id))?,
            device_token: nested("deviceToken", DeviceToken::of(self.device_token.as_str()))?,
            challenge_id: nested("challengeId", ChallengeId::parse(&self.challenge_id))?,
            title: nested("challengeTitle", ChallengeTitle::of(self.challenge_title.as_str()))?,
            message: nested(
                "challengeMessage",
                ChallengeMessage::of(self.challenge_message.as_str()),
            )?,
        })
    }
}
