//! # Domain Aggregates
//!
//! Immutable records composed of value types and validated as a whole at
//! construction.
//!
//! Actions and challenges share a three-way [`Resolution`]: `Pending`,
//! `Authorized` or `Denied`. A state transition on chain is observed as a new
//! instance, never as a mutation.

use serde::Serialize;

use crate::errors::{ValidationError, Violations};
use crate::values::*;

// =============================================================================
// RESOLUTION
// =============================================================================

/// Mutually exclusive lifecycle state of an action or challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Resolution {
    Pending,
    Authorized {
        #[serde(rename = "authorizedDate")]
        authorized_date: Timestamp,
    },
    Denied {
        #[serde(rename = "deniedDate")]
        denied_date: Timestamp,
    },
}

impl Resolution {
    pub fn authorized_date(&self) -> Option<Timestamp> {
        match self {
            Resolution::Authorized { authorized_date } => Some(*authorized_date),
            _ => None,
        }
    }

    pub fn denied_date(&self) -> Option<Timestamp> {
        match self {
            Resolution::Denied { denied_date } => Some(*denied_date),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending)
    }
}

// =============================================================================
// AGENT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    id: AgentId,
    name: AgentName,
    username: AgentUsername,
    creation_date: Timestamp,
}

impl Agent {
    pub fn new(
        id: AgentId,
        name: AgentName,
        username: AgentUsername,
        creation_date: Timestamp,
    ) -> Result<Self, ValidationError> {
        let mut violations = Violations::default();
        violations.check(!id.is_sentinel(), "id", "must not be zero");
        violations.finish(format!("Agent {}", id))?;
        Ok(Self {
            id,
            name,
            username,
            creation_date,
        })
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &AgentName {
        &self.name
    }

    pub fn username(&self) -> &AgentUsername {
        &self.username
    }

    pub fn creation_date(&self) -> Timestamp {
        self.creation_date
    }
}

// =============================================================================
// DEVICE
// =============================================================================

/// Whether a device may still receive challenges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DeviceStatus {
    Active,
    Obsolete {
        #[serde(rename = "obsoleteReason")]
        reason: ObsoleteDeviceReason,
        #[serde(rename = "obsoleteDate")]
        obsolete_date: Timestamp,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetails {
    pub id: DeviceId,
    pub agent_id: AgentId,
    pub name: DeviceName,
    pub token: DeviceToken,
    pub creation_date: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    #[serde(flatten)]
    details: DeviceDetails,
    #[serde(flatten)]
    status: DeviceStatus,
}

impl Device {
    pub fn new(details: DeviceDetails, status: DeviceStatus) -> Result<Self, ValidationError> {
        let mut violations = Violations::default();
        violations.check(!details.id.is_sentinel(), "id", "must not be zero");
        violations.finish(format!("Device {}", details.id))?;
        Ok(Self { details, status })
    }

    pub fn details(&self) -> &DeviceDetails {
        &self.details
    }

    pub fn id(&self) -> DeviceId {
        self.details.id
    }

    pub fn status(&self) -> &DeviceStatus {
        &self.status
    }

    pub fn is_obsolete(&self) -> bool {
        matches!(self.status, DeviceStatus::Obsolete { .. })
    }
}

// =============================================================================
// CHALLENGE
// =============================================================================

/// Fields shared by every challenge state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeDetails {
    pub id: ChallengeId,
    pub policy_id: PolicyId,
    pub action_id: ActionId,
    pub agent_id: AgentId,
    pub device_id: DeviceId,
    pub device_token: DeviceToken,
    pub title: ChallengeTitle,
    pub message: ChallengeMessage,
    pub emit_date: Timestamp,
}

/// A request for one agent's device to approve or deny an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Challenge {
    #[serde(flatten)]
    details: ChallengeDetails,
    #[serde(flatten)]
    status: Resolution,
}

impl Challenge {
    pub fn new(details: ChallengeDetails, status: Resolution) -> Result<Self, ValidationError> {
        let mut violations = Violations::default();
        violations.check(!details.id.is_sentinel(), "id", "must not be zero");
        violations.finish(format!("Challenge {}", details.id))?;
        Ok(Self { details, status })
    }

    pub fn details(&self) -> &ChallengeDetails {
        &self.details
    }

    pub fn id(&self) -> ChallengeId {
        self.details.id
    }

    pub fn status(&self) -> Resolution {
        self.status
    }

    pub fn authorized_date(&self) -> Option<Timestamp> {
        self.status.authorized_date()
    }

    pub fn denied_date(&self) -> Option<Timestamp> {
        self.status.denied_date()
    }
}

// =============================================================================
// ACTION
// =============================================================================

/// Fields shared by every action state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDetails {
    pub id: ActionId,
    pub policy_id: PolicyId,
    pub authorized_challenges: Vec<ChallengeId>,
    pub denied_challenges: Vec<ChallengeId>,
    pub pending_challenges: Vec<ChallengeId>,
    pub request_date: Timestamp,
}

/// A request to perform something guarded by a policy.
///
/// The three challenge collections keep contract emission order and never
/// contain the zero sentinel or duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    #[serde(flatten)]
    details: ActionDetails,
    #[serde(flatten)]
    status: Resolution,
}

impl Action {
    pub fn new(details: ActionDetails, status: Resolution) -> Result<Self, ValidationError> {
        let mut violations = Violations::default();
        violations.check(!details.id.is_sentinel(), "id", "must not be zero");
        for (field, ids) in [
            ("authorizedChallenges", &details.authorized_challenges),
            ("deniedChallenges", &details.denied_challenges),
            ("pendingChallenges", &details.pending_challenges),
        ] {
            violations.check(
                ids.iter().all(|id| !id.is_sentinel()),
                field,
                "must not contain zero",
            );
            violations.check(is_unique(ids), field, "must not contain duplicates");
        }
        violations.finish(format!("Action {}", details.id))?;
        Ok(Self { details, status })
    }

    pub fn details(&self) -> &ActionDetails {
        &self.details
    }

    pub fn id(&self) -> ActionId {
        self.details.id
    }

    pub fn status(&self) -> Resolution {
        self.status
    }

    pub fn authorized_date(&self) -> Option<Timestamp> {
        self.status.authorized_date()
    }

    pub fn denied_date(&self) -> Option<Timestamp> {
        self.status.denied_date()
    }
}

// =============================================================================
// ISSUED CHALLENGE
// =============================================================================

/// A challenge handed to a device for approval, as announced by the
/// challenger contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedChallenge {
    pub organization_id: OrganizationId,
    pub policy_id: PolicyId,
    pub action_id: ActionId,
    pub device_id: DeviceId,
    pub device_token: DeviceToken,
    pub challenge_id: ChallengeId,
    pub title: ChallengeTitle,
    pub message: ChallengeMessage,
}

fn is_unique(ids: &[ChallengeId]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().all(|id| seen.insert(*id))
}
