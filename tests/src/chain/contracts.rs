//! Contract behavior of the simulated chain.
//!
//! A [`Ledger`] holds every deployed contract. Transactions run against a
//! copy of it and only replace the original when they succeed, so a revert
//! leaves no trace. Cross-contract calls go through [`Ledger::invoke`] with
//! the calling contract as sender, the way the contracts authorize each
//! other through `AccessControl`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use ac_01_web3_transport::{Address, DynSolValue, JsonAbi, U256};

use super::abi::Kind;

/// Reason string carried by a revert.
pub type Revert = String;

/// One event raised while executing a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub address: Address,
    pub event: &'static str,
    pub values: Vec<DynSolValue>,
}

// =============================================================================
// RECORDS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
struct ChallengeRecord {
    policy: U256,
    action: U256,
    agent: U256,
    device: U256,
    token: String,
    id: U256,
    title: String,
    message: String,
    emit_date: U256,
}

impl ChallengeRecord {
    fn tuple(&self, resolved: Option<U256>) -> DynSolValue {
        let mut fields = vec![
            uint(self.policy),
            uint(self.action),
            uint(self.agent),
            uint(self.device),
            DynSolValue::String(self.token.clone()),
            uint(self.id),
            DynSolValue::String(self.title.clone()),
            DynSolValue::String(self.message.clone()),
            uint(self.emit_date),
        ];
        fields.extend(resolved.map(uint));
        DynSolValue::Tuple(fields)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ActionRecord {
    id: U256,
    policy: U256,
    authorized: Vec<U256>,
    denied: Vec<U256>,
    pending: Vec<U256>,
    request_date: U256,
}

impl ActionRecord {
    fn tuple(&self, resolved: Option<U256>) -> DynSolValue {
        let ids = |ids: &[U256]| DynSolValue::Array(ids.iter().copied().map(uint).collect());
        let mut fields = vec![
            uint(self.id),
            uint(self.policy),
            ids(&self.authorized),
            ids(&self.denied),
            ids(&self.pending),
            uint(self.request_date),
        ];
        fields.extend(resolved.map(uint));
        DynSolValue::Tuple(fields)
    }
}

/// Pending, authorized and denied buckets keyed by id. Resolved entries
/// carry their resolution date.
#[derive(Debug, Clone)]
struct Buckets<R> {
    last: U256,
    pending: BTreeMap<U256, R>,
    authorized: BTreeMap<U256, (R, U256)>,
    denied: BTreeMap<U256, (R, U256)>,
}

impl<R> Default for Buckets<R> {
    fn default() -> Self {
        Self {
            last: U256::ZERO,
            pending: BTreeMap::new(),
            authorized: BTreeMap::new(),
            denied: BTreeMap::new(),
        }
    }
}

impl<R: Clone> Buckets<R> {
    fn next_id(&mut self) -> U256 {
        self.last += U256::from(1u64);
        self.last
    }

    fn remove(&mut self, id: U256) {
        self.pending.remove(&id);
        self.authorized.remove(&id);
        self.denied.remove(&id);
    }

    fn take_pending(&mut self, id: U256, kind: &str) -> Result<R, Revert> {
        self.pending
            .remove(&id)
            .ok_or_else(|| format!("Expecting a pending {}", kind))
    }
}

// =============================================================================
// CONTRACT STATE
// =============================================================================

#[derive(Debug, Clone)]
enum State {
    AccessControl {
        owners: Vec<Address>,
        admins: Vec<Address>,
        users: Vec<Address>,
    },
    Challenger {
        access: Address,
    },
    Challenges {
        access: Address,
        challenger: Address,
        challenges: Buckets<ChallengeRecord>,
    },
    Actions {
        access: Address,
        challenges: Address,
        actions: Buckets<ActionRecord>,
    },
    DomainNameSystem {
        access: Address,
        entries: HashMap<String, Address>,
    },
    Organizations {
        access: Address,
        last: U256,
        organizations: BTreeMap<U256, Address>,
    },
    Organization {
        id: U256,
        challenges: Address,
        view: Address,
    },
    AgentChallengesView {
        challenges: Address,
    },
}

#[derive(Debug, Clone)]
struct Deployed {
    kind: Kind,
    abi: Arc<JsonAbi>,
    state: State,
}

// =============================================================================
// LEDGER
// =============================================================================

#[derive(Debug, Clone)]
pub struct Ledger {
    contracts: HashMap<Address, Deployed>,
    deployments: u64,
    now: u64,
}

impl Ledger {
    pub fn new(genesis: u64) -> Self {
        Self {
            contracts: HashMap::new(),
            deployments: 0,
            now: genesis,
        }
    }

    /// Seconds-since-epoch of the block being built.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Seal the current block; the next one is one second later.
    pub fn advance(&mut self) {
        self.now += 1;
    }

    pub fn abi(&self, address: &Address) -> Option<Arc<JsonAbi>> {
        self.contracts.get(address).map(|c| c.abi.clone())
    }

    pub fn kind(&self, address: &Address) -> Option<Kind> {
        self.contracts.get(address).map(|c| c.kind)
    }

    /// Create a contract from `kind`'s constructor arguments.
    pub fn deploy(
        &mut self,
        deployer: Address,
        kind: Kind,
        abi: Arc<JsonAbi>,
        args: Vec<DynSolValue>,
    ) -> Result<Address, Revert> {
        self.deployments += 1;
        let address = Address::left_padding_from(&(0x1000 + self.deployments).to_be_bytes());
        let state = match kind {
            Kind::AccessControl => State::AccessControl {
                owners: vec![Address::ZERO, deployer],
                admins: vec![Address::ZERO],
                users: vec![Address::ZERO],
            },
            Kind::Challenger => State::Challenger {
                access: address_arg(&args, 0)?,
            },
            Kind::Challenges => State::Challenges {
                access: address_arg(&args, 0)?,
                challenger: address_arg(&args, 1)?,
                challenges: Buckets::default(),
            },
            Kind::Actions => State::Actions {
                access: address_arg(&args, 0)?,
                challenges: address_arg(&args, 1)?,
                actions: Buckets::default(),
            },
            Kind::DomainNameSystem => State::DomainNameSystem {
                access: address_arg(&args, 0)?,
                entries: HashMap::new(),
            },
            Kind::Organizations => State::Organizations {
                access: address_arg(&args, 0)?,
                last: U256::ZERO,
                organizations: BTreeMap::new(),
            },
            Kind::Organization => State::Organization {
                id: U256::ZERO,
                challenges: address_arg(&args, 0)?,
                view: address_arg(&args, 1)?,
            },
            Kind::AgentChallengesView => State::AgentChallengesView {
                challenges: address_arg(&args, 0)?,
            },
        };
        self.contracts.insert(address, Deployed { kind, abi, state });
        Ok(address)
    }

    /// Run `method` on the contract at `to` as `caller`.
    pub fn invoke(
        &mut self,
        caller: Address,
        to: Address,
        method: &str,
        args: Vec<DynSolValue>,
        emitted: &mut Vec<Emission>,
    ) -> Result<Vec<DynSolValue>, Revert> {
        let kind = self
            .kind(&to)
            .ok_or_else(|| format!("no contract at {:?}", to))?;
        if method == "destroy" {
            self.contracts.remove(&to);
            return Ok(Vec::new());
        }
        match kind {
            Kind::AccessControl => self.access_control(caller, to, method, &args),
            Kind::Challenger => self.challenger(caller, to, method, args, emitted),
            Kind::Challenges => self.challenges(caller, to, method, &args, emitted),
            Kind::Actions => self.actions(caller, to, method, &args, emitted),
            Kind::DomainNameSystem => self.domain_name_system(caller, to, method, &args),
            Kind::Organizations => self.organizations(caller, to, method, &args, emitted),
            Kind::Organization => self.organization(caller, to, method, &args),
            Kind::AgentChallengesView => self.agent_challenges_view(to, method, &args),
        }
    }

    fn state_mut(&mut self, address: &Address) -> Result<&mut State, Revert> {
        self.contracts
            .get_mut(address)
            .map(|c| &mut c.state)
            .ok_or_else(|| format!("no contract at {:?}", address))
    }

    fn state(&self, address: &Address) -> Result<&State, Revert> {
        self.contracts
            .get(address)
            .map(|c| &c.state)
            .ok_or_else(|| format!("no contract at {:?}", address))
    }

    /// Owners and admins may mutate the contracts guarded by `access`.
    fn require_admin(&self, access: Address, caller: Address) -> Result<(), Revert> {
        match self.state(&access)? {
            State::AccessControl { owners, admins, .. }
                if owners.contains(&caller) || admins.contains(&caller) =>
            {
                Ok(())
            }
            State::AccessControl { .. } => Err("Sender is neither an owner nor an admin".into()),
            _ => Err("access address is not an AccessControl contract".into()),
        }
    }

    // =========================================================================
    // ACCESS CONTROL
    // =========================================================================

    fn access_control(
        &mut self,
        caller: Address,
        to: Address,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, Revert> {
        let State::AccessControl {
            owners,
            admins,
            users,
        } = self.state_mut(&to)?
        else {
            return Err(mismatch(method));
        };
        let privileged = owners.contains(&caller) || admins.contains(&caller);
        let listed = |members: &[Address]| {
            DynSolValue::Array(members.iter().copied().map(DynSolValue::Address).collect())
        };

        match method {
            "getOwners" => Ok(vec![listed(owners)]),
            "getAdmins" => Ok(vec![listed(admins)]),
            "getUsers" => Ok(vec![listed(users)]),
            "senderRequires" => {
                let held = match uint_arg(args, 0)?.saturating_to::<u64>() {
                    1 => owners.contains(&caller),
                    2 => admins.contains(&caller),
                    3 => users.contains(&caller),
                    _ => return Err("Uninitialized role".into()),
                };
                if held {
                    Ok(Vec::new())
                } else {
                    Err("Sender does not hold the required role".into())
                }
            }
            "addOwner" | "addAdmin" | "addUser" => {
                if !privileged {
                    return Err("Sender is neither an owner nor an admin".into());
                }
                let member = address_arg(args, 0)?;
                if owners.contains(&member) {
                    return Err("Already present as an owner".into());
                }
                if admins.contains(&member) {
                    return Err("Already present as an admin".into());
                }
                if users.contains(&member) {
                    return Err("Already present as a user".into());
                }
                match method {
                    "addOwner" => owners.push(member),
                    "addAdmin" => admins.push(member),
                    _ => users.push(member),
                }
                Ok(Vec::new())
            }
            "removeOwner" | "removeAdmin" | "removeUser" => {
                if !privileged {
                    return Err("Sender is neither an owner nor an admin".into());
                }
                let member = address_arg(args, 0)?;
                let (members, role) = match method {
                    "removeOwner" => (owners, "an owner"),
                    "removeAdmin" => (admins, "an admin"),
                    _ => (users, "a user"),
                };
                let index = members
                    .iter()
                    .position(|m| *m == member)
                    .ok_or_else(|| format!("Not present as {}", role))?;
                members.remove(index);
                Ok(Vec::new())
            }
            _ => Err(mismatch(method)),
        }
    }

    // =========================================================================
    // CHALLENGER
    // =========================================================================

    fn challenger(
        &mut self,
        caller: Address,
        to: Address,
        method: &str,
        args: Vec<DynSolValue>,
        emitted: &mut Vec<Emission>,
    ) -> Result<Vec<DynSolValue>, Revert> {
        let State::Challenger { access } = self.state(&to)? else {
            return Err(mismatch(method));
        };
        if method != "issue" {
            return Err(mismatch(method));
        }
        self.require_admin(*access, caller)?;
        if uint_arg(&args, 5)?.is_zero() {
            return Err("Uninitialized challengeId".into());
        }
        emitted.push(Emission {
            address: to,
            event: "issueChallenge",
            values: args,
        });
        Ok(Vec::new())
    }

    // =========================================================================
    // CHALLENGES
    // =========================================================================

    fn challenges(
        &mut self,
        caller: Address,
        to: Address,
        method: &str,
        args: &[DynSolValue],
        emitted: &mut Vec<Emission>,
    ) -> Result<Vec<DynSolValue>, Revert> {
        let now = U256::from(self.now);
        let State::Challenges {
            access, challenger, ..
        } = self.state(&to)?
        else {
            return Err(mismatch(method));
        };
        let (access, challenger) = (*access, *challenger);

        if method == "createPending" {
            self.require_admin(access, caller)?;
            let record = {
                let challenges = self.challenge_buckets(&to)?;
                let record = ChallengeRecord {
                    policy: uint_arg(args, 1)?,
                    agent: uint_arg(args, 2)?,
                    action: uint_arg(args, 3)?,
                    device: uint_arg(args, 4)?,
                    token: string_arg(args, 5)?,
                    id: challenges.next_id(),
                    title: string_arg(args, 6)?,
                    message: string_arg(args, 7)?,
                    emit_date: now,
                };
                challenges.pending.insert(record.id, record.clone());
                record
            };
            emitted.push(Emission {
                address: to,
                event: "createdPendingChallenge",
                values: vec![record.tuple(None)],
            });
            let issue = vec![
                uint(uint_arg(args, 0)?),
                uint(record.policy),
                uint(record.action),
                uint(record.device),
                DynSolValue::String(record.token.clone()),
                uint(record.id),
                DynSolValue::String(record.title.clone()),
                DynSolValue::String(record.message.clone()),
            ];
            self.invoke(to, challenger, "issue", issue, emitted)?;
            return Ok(Vec::new());
        }

        if method == "lastChallengeId" {
            return Ok(vec![uint(self.challenge_buckets(&to)?.last)]);
        }

        let id = uint_arg(args, 0)?;
        if id.is_zero() {
            return Err("Uninitialized challengeId".into());
        }
        let challenges = self.challenge_buckets(&to)?;
        match method {
            "getPending" => Ok(vec![challenges
                .pending
                .get(&id)
                .map(|c| c.tuple(None))
                .unwrap_or_else(|| ChallengeRecord::default().tuple(None))]),
            "getAuthorized" => Ok(vec![resolved_tuple(challenges.authorized.get(&id))]),
            "getDenied" => Ok(vec![resolved_tuple(challenges.denied.get(&id))]),
            "remove" | "authorize" | "deny" => {
                self.require_admin(access, caller)?;
                let challenges = self.challenge_buckets(&to)?;
                if method == "remove" {
                    challenges.remove(id);
                    return Ok(Vec::new());
                }
                let record = challenges.take_pending(id, "challenge")?;
                let event = if method == "authorize" {
                    challenges.authorized.insert(id, (record.clone(), now));
                    "createdAuthorizedChallenge"
                } else {
                    challenges.denied.insert(id, (record.clone(), now));
                    "createdDeniedChallenge"
                };
                emitted.push(Emission {
                    address: to,
                    event,
                    values: vec![record.tuple(Some(now))],
                });
                Ok(Vec::new())
            }
            _ => Err(mismatch(method)),
        }
    }

    fn challenge_buckets(&mut self, at: &Address) -> Result<&mut Buckets<ChallengeRecord>, Revert> {
        match self.state_mut(at)? {
            State::Challenges { challenges, .. } => Ok(challenges),
            _ => Err("not a Challenges contract".into()),
        }
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    fn actions(
        &mut self,
        caller: Address,
        to: Address,
        method: &str,
        args: &[DynSolValue],
        emitted: &mut Vec<Emission>,
    ) -> Result<Vec<DynSolValue>, Revert> {
        let now = U256::from(self.now);
        let State::Actions {
            access, challenges, ..
        } = self.state(&to)?
        else {
            return Err(mismatch(method));
        };
        let (access, challenges) = (*access, *challenges);

        match method {
            "createPending" => {
                self.require_admin(access, caller)?;
                let actions = self.action_buckets(&to)?;
                let record = ActionRecord {
                    id: actions.next_id(),
                    policy: uint_arg(args, 0)?,
                    request_date: now,
                    ..ActionRecord::default()
                };
                actions.pending.insert(record.id, record.clone());
                emitted.push(Emission {
                    address: to,
                    event: "createdPendingAction",
                    values: vec![record.tuple(None)],
                });
                return Ok(Vec::new());
            }
            "lastActionId" => return Ok(vec![uint(self.action_buckets(&to)?.last)]),
            "createPendingChallenge" => {
                self.require_admin(access, caller)?;
                let action = uint_arg(args, 2)?;
                if action.is_zero() {
                    return Err("Uninitialized actionId".into());
                }
                if !self.action_buckets(&to)?.pending.contains_key(&action) {
                    return Err("Expecting a pending action".into());
                }
                let create = vec![
                    args[0].clone(),
                    args[1].clone(),
                    args[3].clone(),
                    args[2].clone(),
                    args[4].clone(),
                    args[5].clone(),
                    args[6].clone(),
                    args[7].clone(),
                ];
                self.invoke(to, challenges, "createPending", create, emitted)?;
                let created = self.challenge_buckets(&challenges)?.last;
                if let Some(pending) = self.action_buckets(&to)?.pending.get_mut(&action) {
                    pending.pending.push(created);
                }
                return Ok(Vec::new());
            }
            "authorizePendingChallenge" | "denyPendingChallenge" => {
                self.require_admin(access, caller)?;
                let action = uint_arg(args, 0)?;
                let challenge = uint_arg(args, 1)?;
                if action.is_zero() {
                    return Err("Uninitialized actionId".into());
                }
                let record = self
                    .action_buckets(&to)?
                    .pending
                    .get_mut(&action)
                    .ok_or_else(|| "Expecting a pending action".to_string())?;
                let index = record
                    .pending
                    .iter()
                    .position(|id| *id == challenge)
                    .ok_or_else(|| {
                        "Expecting to have found the index of the Pending Challenge".to_string()
                    })?;
                record.pending.remove(index);
                let resolution = if method == "authorizePendingChallenge" {
                    record.authorized.push(challenge);
                    "authorize"
                } else {
                    record.denied.push(challenge);
                    "deny"
                };
                self.invoke(
                    to,
                    challenges,
                    resolution,
                    vec![uint(challenge)],
                    emitted,
                )?;
                return Ok(Vec::new());
            }
            _ => {}
        }

        let id = uint_arg(args, 0)?;
        if id.is_zero() {
            return Err("Uninitialized actionId".into());
        }
        let actions = self.action_buckets(&to)?;
        match method {
            "getPending" => Ok(vec![actions
                .pending
                .get(&id)
                .map(|a| a.tuple(None))
                .unwrap_or_else(|| ActionRecord::default().tuple(None))]),
            "getAuthorized" => Ok(vec![resolved_action(actions.authorized.get(&id))]),
            "getDenied" => Ok(vec![resolved_action(actions.denied.get(&id))]),
            "remove" | "authorize" | "deny" => {
                self.require_admin(access, caller)?;
                let actions = self.action_buckets(&to)?;
                if method == "remove" {
                    actions.remove(id);
                    return Ok(Vec::new());
                }
                let record = actions.take_pending(id, "action")?;
                let event = if method == "authorize" {
                    actions.authorized.insert(id, (record.clone(), now));
                    "createdAuthorizedAction"
                } else {
                    actions.denied.insert(id, (record.clone(), now));
                    "createdDeniedAction"
                };
                emitted.push(Emission {
                    address: to,
                    event,
                    values: vec![record.tuple(Some(now))],
                });
                Ok(Vec::new())
            }
            _ => Err(mismatch(method)),
        }
    }

    fn action_buckets(&mut self, at: &Address) -> Result<&mut Buckets<ActionRecord>, Revert> {
        match self.state_mut(at)? {
            State::Actions { actions, .. } => Ok(actions),
            _ => Err("not an Actions contract".into()),
        }
    }

    // =========================================================================
    // DOMAIN NAME SYSTEM
    // =========================================================================

    fn domain_name_system(
        &mut self,
        caller: Address,
        to: Address,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, Revert> {
        let State::DomainNameSystem { access, .. } = self.state(&to)? else {
            return Err(mismatch(method));
        };
        let access = *access;
        let domain = string_arg(args, 0)?;
        if method == "update" {
            self.require_admin(access, caller)?;
        }
        let State::DomainNameSystem { entries, .. } = self.state_mut(&to)? else {
            return Err(mismatch(method));
        };
        match method {
            "update" => {
                entries.insert(domain, address_arg(args, 1)?);
                Ok(Vec::new())
            }
            "lookup" => Ok(vec![DynSolValue::Address(
                entries.get(&domain).copied().unwrap_or(Address::ZERO),
            )]),
            _ => Err(mismatch(method)),
        }
    }

    // =========================================================================
    // ORGANIZATIONS
    // =========================================================================

    fn organizations(
        &mut self,
        caller: Address,
        to: Address,
        method: &str,
        args: &[DynSolValue],
        emitted: &mut Vec<Emission>,
    ) -> Result<Vec<DynSolValue>, Revert> {
        let State::Organizations { access, .. } = self.state(&to)? else {
            return Err(mismatch(method));
        };
        let access = *access;
        if matches!(method, "add" | "remove") {
            self.require_admin(access, caller)?;
        }

        let State::Organizations {
            last,
            organizations,
            ..
        } = self.state_mut(&to)?
        else {
            return Err(mismatch(method));
        };
        match method {
            "lastOrganizationId" => Ok(vec![uint(*last)]),
            "add" => {
                let organization = address_arg(args, 0)?;
                *last += U256::from(1u64);
                let id = *last;
                organizations.insert(id, organization);
                self.invoke(to, organization, "init", vec![uint(id)], emitted)?;
                Ok(Vec::new())
            }
            "get" | "remove" => {
                let id = uint_arg(args, 0)?;
                if id.is_zero() {
                    return Err("Uninitialized organizationId".into());
                }
                if method == "remove" {
                    organizations.remove(&id);
                    return Ok(Vec::new());
                }
                Ok(vec![DynSolValue::Address(
                    organizations.get(&id).copied().unwrap_or(Address::ZERO),
                )])
            }
            _ => Err(mismatch(method)),
        }
    }

    fn organization(
        &mut self,
        _caller: Address,
        to: Address,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, Revert> {
        let State::Organization {
            id,
            challenges,
            view,
        } = self.state_mut(&to)?
        else {
            return Err(mismatch(method));
        };
        match method {
            "init" => {
                if !id.is_zero() {
                    return Err("Organization already initialized".into());
                }
                *id = uint_arg(args, 0)?;
                Ok(Vec::new())
            }
            "getOrganizationId" => Ok(vec![uint(*id)]),
            "challengesAddress" => Ok(vec![DynSolValue::Address(*challenges)]),
            "agentChallengeViewAddress" => Ok(vec![DynSolValue::Address(*view)]),
            _ => Err(mismatch(method)),
        }
    }

    // =========================================================================
    // AGENT CHALLENGES VIEW
    // =========================================================================

    /// One slot per challenge ever created; slots not belonging to the agent
    /// in the requested bucket stay zero.
    fn agent_challenges_view(
        &mut self,
        to: Address,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, Revert> {
        let State::AgentChallengesView { challenges } = self.state(&to)? else {
            return Err(mismatch(method));
        };
        let challenges = *challenges;
        if !matches!(
            method,
            "pendingChallengeIdsForAgent"
                | "authorizedChallengeIdsForAgent"
                | "deniedChallengeIdsForAgent"
        ) {
            return Err(mismatch(method));
        }
        let agent = uint_arg(args, 0)?;
        let buckets = self.challenge_buckets(&challenges)?;
        let belongs = |id: &U256| -> bool {
            match method {
                "pendingChallengeIdsForAgent" => {
                    buckets.pending.get(id).is_some_and(|c| c.agent == agent)
                }
                "authorizedChallengeIdsForAgent" => buckets
                    .authorized
                    .get(id)
                    .is_some_and(|(c, _)| c.agent == agent),
                _ => buckets.denied.get(id).is_some_and(|(c, _)| c.agent == agent),
            }
        };
        let slots = (1..=buckets.last.saturating_to::<u64>())
            .map(U256::from)
            .map(|id| uint(if belongs(&id) { id } else { U256::ZERO }))
            .collect();
        Ok(vec![DynSolValue::Array(slots)])
    }
}

fn resolved_tuple(entry: Option<&(ChallengeRecord, U256)>) -> DynSolValue {
    match entry {
        Some((record, date)) => record.tuple(Some(*date)),
        None => ChallengeRecord::default().tuple(Some(U256::ZERO)),
    }
}

fn resolved_action(entry: Option<&(ActionRecord, U256)>) -> DynSolValue {
    match entry {
        Some((record, date)) => record.tuple(Some(*date)),
        None => ActionRecord::default().tuple(Some(U256::ZERO)),
    }
}

fn mismatch(method: &str) -> Revert {
    format!("function {} is not implemented", method)
}

fn argument(args: &[DynSolValue], index: usize) -> Result<&DynSolValue, Revert> {
    args.get(index)
        .ok_or_else(|| format!("missing argument {}", index))
}

fn uint(value: U256) -> DynSolValue {
    DynSolValue::Uint(value, 256)
}

fn uint_arg(args: &[DynSolValue], index: usize) -> Result<U256, Revert> {
    argument(args, index)?
        .as_uint()
        .map(|(value, _)| value)
        .ok_or_else(|| format!("argument {} is not a uint", index))
}

fn address_arg(args: &[DynSolValue], index: usize) -> Result<Address, Revert> {
    argument(args, index)?
        .as_address()
        .ok_or_else(|| format!("argument {} is not an address", index))
}

fn string_arg(args: &[DynSolValue], index: usize) -> Result<String, Revert> {
    argument(args, index)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("argument {} is not a string", index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_01_web3_transport::abi::{parse_abi, uint256};

    fn abi(kind: Kind) -> Arc<JsonAbi> {
        Arc::new(parse_abi(&kind.abi()).unwrap())
    }

    fn deployer() -> Address {
        Address::repeat_byte(0xf1)
    }

    fn challenge_args(agent: u64) -> Vec<DynSolValue> {
        vec![
            uint256(121u64),
            uint256(55u64),
            uint256(agent),
            uint256(4u64),
            uint256(300u64),
            DynSolValue::String("sdasdasdasoooo".into()),
            DynSolValue::String("A very important title".into()),
            DynSolValue::String("Super secret message".into()),
        ]
    }

    /// AccessControl, Challenger and Challenges wired the way they are
    /// deployed for real.
    fn wired() -> (Ledger, Address, Address, Address) {
        let mut ledger = Ledger::new(1_600_000_000);
        let access = ledger
            .deploy(deployer(), Kind::AccessControl, abi(Kind::AccessControl), Vec::new())
            .unwrap();
        let challenger = ledger
            .deploy(
                deployer(),
                Kind::Challenger,
                abi(Kind::Challenger),
                vec![DynSolValue::Address(access)],
            )
            .unwrap();
        let challenges = ledger
            .deploy(
                deployer(),
                Kind::Challenges,
                abi(Kind::Challenges),
                vec![DynSolValue::Address(access), DynSolValue::Address(challenger)],
            )
            .unwrap();
        ledger
            .invoke(
                deployer(),
                access,
                "addAdmin",
                vec![DynSolValue::Address(challenges)],
                &mut Vec::new(),
            )
            .unwrap();
        (ledger, access, challenger, challenges)
    }

    #[test]
    fn test_access_control_starts_with_zero_members() {
        let (mut ledger, access, _, challenges) = wired();
        let owners = ledger
            .invoke(deployer(), access, "getOwners", Vec::new(), &mut Vec::new())
            .unwrap();
        assert_eq!(
            owners,
            vec![DynSolValue::Array(vec![
                DynSolValue::Address(Address::ZERO),
                DynSolValue::Address(deployer())
            ])]
        );

        let error = ledger
            .invoke(
                deployer(),
                access,
                "addUser",
                vec![DynSolValue::Address(challenges)],
                &mut Vec::new(),
            )
            .unwrap_err();
        assert_eq!(error, "Already present as an admin");
    }

    #[test]
    fn test_create_pending_emits_through_challenger() {
        let (mut ledger, _, challenger, challenges) = wired();
        let mut emitted = Vec::new();
        ledger
            .invoke(deployer(), challenges, "createPending", challenge_args(22), &mut emitted)
            .unwrap();

        let events: Vec<(Address, &str)> = emitted.iter().map(|e| (e.address, e.event)).collect();
        assert_eq!(
            events,
            vec![
                (challenges, "createdPendingChallenge"),
                (challenger, "issueChallenge")
            ]
        );
        assert_eq!(emitted[1].values[5], uint256(1u64));
    }

    #[test]
    fn test_challenger_refuses_unprivileged_sender() {
        let (mut ledger, _, challenger, _) = wired();
        let mut args = challenge_args(22);
        args[5] = uint256(9u64);
        let error = ledger
            .invoke(Address::repeat_byte(0x99), challenger, "issue", args, &mut Vec::new())
            .unwrap_err();
        assert_eq!(error, "Sender is neither an owner nor an admin");
    }

    #[test]
    fn test_view_pads_foreign_slots_with_zero() {
        let (mut ledger, _, _, challenges) = wired();
        for agent in [22, 23, 22] {
            ledger
                .invoke(deployer(), challenges, "createPending", challenge_args(agent), &mut Vec::new())
                .unwrap();
        }
        let view = ledger
            .deploy(
                deployer(),
                Kind::AgentChallengesView,
                abi(Kind::AgentChallengesView),
                vec![DynSolValue::Address(challenges)],
            )
            .unwrap();

        let ids = ledger
            .invoke(
                deployer(),
                view,
                "pendingChallengeIdsForAgent",
                vec![uint256(22u64)],
                &mut Vec::new(),
            )
            .unwrap();
        assert_eq!(
            ids,
            vec![DynSolValue::Array(vec![
                uint256(1u64),
                uint(U256::ZERO),
                uint256(3u64),
            ])]
        );
    }

    #[test]
    fn test_destroy_removes_contract() {
        let (mut ledger, _, _, challenges) = wired();
        ledger
            .invoke(deployer(), challenges, "destroy", Vec::new(), &mut Vec::new())
            .unwrap();
        assert!(ledger.kind(&challenges).is_none());
    }
}
