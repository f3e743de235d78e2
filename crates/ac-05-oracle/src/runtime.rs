//! Oracle lifecycle: startup wiring, reset loop, shutdown.
//!
//! ```text
//!  provider ends ──on_end──► resets channel ──► reset() ──► reconnect()?
//!                                                   │            │ true
//!                                                   │            ▼
//!                                                   │     listen() again
//!                                                   ▼
//!                                        false: someone else already swapped
//! ```

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ac_01_web3_transport::{Web3Connection, WebSocketWeb3};
use async_trait::async_trait;
use ac_02_contract_gateway::{ContractEnvironment, Facade};
use ac_03_contract_facades::{AgentChallengesView, Challenger, DomainNameSystem};
use ac_04_event_listeners::{ChallengerListener, Listening};
use shared_types::{DomainName, EthereumAddress, IssuedChallenge, OrganizationId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::RelistenPolicy;
use crate::errors::OracleError;
use crate::notifier::{dispatch, Notifier};
use crate::organizations::OrganizationDirectory;

/// An event connection whose dead provider can be swapped for a fresh one.
#[async_trait]
pub trait Reconnect: Web3Connection {
    /// Swap the provider if the current one has ended. Returns whether a
    /// swap happened.
    async fn reconnect(&self) -> bool;
}

#[async_trait]
impl Reconnect for WebSocketWeb3 {
    async fn reconnect(&self) -> bool {
        match self.reset_web_socket().await {
            Ok(swapped) => swapped,
            Err(e) => {
                error!(error = %e, "WebSocket provider could not be reopened");
                false
            }
        }
    }
}

/// Startup inputs that are not connections.
#[derive(Debug, Clone)]
pub struct OracleSettings {
    pub dns_address: EthereumAddress,
    pub agent_challenge_views: bool,
    pub relisten: RelistenPolicy,
}

pub struct Oracle<C: Reconnect> {
    events: Arc<C>,
    challenger: ChallengerListener,
    organizations: OrganizationDirectory,
    views: BTreeMap<OrganizationId, AgentChallengesView>,
    relisten: RelistenPolicy,
    issued: mpsc::UnboundedSender<IssuedChallenge>,
    listening: Option<Listening>,
    dispatcher: JoinHandle<()>,
}

impl<C: Reconnect + 'static> Oracle<C> {
    /// Load organizations, resolve the challenger and start listening.
    ///
    /// `reads` answers lookups; `events` carries the subscriptions. Startup
    /// fails on the first lookup that fails.
    pub async fn start(
        reads: ContractEnvironment,
        events: Arc<C>,
        settings: OracleSettings,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, OracleError> {
        let dns = DomainNameSystem::at(&reads, settings.dns_address.clone())?;
        let organizations = OrganizationDirectory::load(&dns, &reads).await?;
        info!(count = organizations.len(), "Organizations loaded");

        let views = if settings.agent_challenge_views {
            organizations.load_agent_challenge_views(&reads).await?
        } else {
            BTreeMap::new()
        };

        let challenger_address = dns.lookup(&DomainName::of(Challenger::NAME)?).await?;
        let event_env = reads.with_connection(events.clone());
        let challenger = ChallengerListener::at(&event_env, challenger_address)?;

        let (issued, received) = mpsc::unbounded_channel();
        let dispatcher = tokio::spawn(dispatch(notifier, received));

        let mut oracle = Self {
            events,
            challenger,
            organizations,
            views,
            relisten: settings.relisten,
            issued,
            listening: None,
            dispatcher,
        };
        oracle.listen().await?;
        Ok(oracle)
    }

    pub fn organizations(&self) -> &OrganizationDirectory {
        &self.organizations
    }

    pub fn agent_challenge_views(&self) -> &BTreeMap<OrganizationId, AgentChallengesView> {
        &self.views
    }

    pub fn is_listening(&self) -> bool {
        self.listening.as_ref().is_some_and(|l| !l.is_finished())
    }

    /// Serve until `shutdown` resolves or the reset channel closes.
    pub async fn run(
        mut self,
        mut resets: mpsc::UnboundedReceiver<()>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), OracleError> {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                signal = resets.recv() => match signal {
                    Some(()) => self.reset().await,
                    None => break,
                },
            }
        }
        self.stop().await;
        Ok(())
    }

    /// React to a provider ending: swap it, then register listeners again.
    ///
    /// Emissions between the end and the new registration are lost.
    pub async fn reset(&mut self) {
        if !self.events.reconnect().await {
            debug!("Provider already replaced");
            return;
        }
        warn!("WebSocket provider replaced, re-registering listeners");

        for attempt in 1..=self.relisten.attempts {
            match self.listen().await {
                Ok(()) => return,
                Err(e) => {
                    warn!(attempt, error = %e, "Re-registering listeners failed");
                    tokio::time::sleep(Duration::from_millis(self.relisten.delay_ms)).await;
                }
            }
        }
        error!(
            attempts = self.relisten.attempts,
            "Listeners not re-registered, issued challenges will be missed"
        );
    }

    async fn listen(&mut self) -> Result<(), OracleError> {
        if let Some(previous) = self.listening.take() {
            previous.abort();
        }
        let issued = self.issued.clone();
        let listening = self
            .challenger
            .start_issue_challenge_listening(move |challenge: IssuedChallenge| {
                debug!(challenge_id = %challenge.challenge_id, "Issued challenge received");
                let _ = issued.send(challenge);
            })
            .await?;
        self.listening = Some(listening);
        Ok(())
    }

    async fn stop(self) {
        if let Some(listening) = self.listening {
            if let Err(e) = listening.stop().await {
                debug!(error = %e, "Unsubscribe on shutdown failed");
            }
        }
        drop(self.issued);
        if let Err(e) = self.dispatcher.await {
            warn!(error = %e, "Notification dispatcher ended abnormally");
        }
        info!("Oracle stopped");
    }
}
