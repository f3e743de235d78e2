//! AC-05 Oracle - forwards issued challenges to agents' devices.
//!
//! ```text
//!   HTTP ──► DomainNameSystem ──► Organizations ──► OrganizationDirectory
//!                    │
//!                    └──► Challenger address
//!                                │
//!   WebSocket ──► ChallengerListener("issueChallenge")
//!                                │ IssuedChallenge
//!                                ▼
//!                      mpsc ──► dispatch ──► Notifier (log | HTTP push)
//! ```
//!
//! ## Startup
//!
//! 1. Read [`OracleConfig`] from `AC_ORACLE_*` variables and validate it
//! 2. Install the tracing subscriber
//! 3. Load every organization; any failed lookup aborts startup
//! 4. Resolve the challenger and subscribe to `issueChallenge`
//! 5. Serve the reset loop until Ctrl-C
//!
//! ## Resets
//!
//! The WebSocket provider reports its own end through a callback. The
//! callback only posts to a channel; the loop swaps the provider and
//! registers the listener again. Challenges issued in between are missed.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod notifier;
pub mod organizations;
pub mod runtime;
pub mod telemetry;

use std::future::Future;
use std::sync::Arc;

use ac_01_web3_transport::{EndCallback, HttpWeb3, WebSocketWeb3};
use ac_02_contract_gateway::{ContractEnvironment, ContractSources};
use tokio::sync::mpsc;
use tracing::info;

pub use config::{OracleConfig, RelistenPolicy};
pub use errors::OracleError;
pub use notifier::{dispatch, HttpNotifier, LogNotifier, Notifier};
pub use organizations::OrganizationDirectory;
pub use runtime::{Oracle, OracleSettings, Reconnect};

/// Contracts whose sources the oracle loads from `contracts_dir`.
pub const CONTRACTS: &[&str] = &[
    "DomainNameSystem",
    "Organizations",
    "Organization",
    "Challenges",
    "AgentChallengesView",
    "Challenger",
];

/// Wire connections from `config` and serve until `shutdown` resolves.
pub async fn serve(
    config: OracleConfig,
    shutdown: impl Future<Output = ()>,
) -> Result<(), OracleError> {
    config.validate()?;

    let sources = Arc::new(ContractSources::from_directory(
        &config.contracts_dir,
        CONTRACTS,
    ));
    let http = HttpWeb3::new(config.http.clone())?;
    let reads = ContractEnvironment::new(
        Arc::new(http),
        config.sender_address()?,
        sources,
        config.gateway,
    );

    let (reset_tx, resets) = mpsc::unbounded_channel();
    let on_end: EndCallback = Arc::new(move || {
        let _ = reset_tx.send(());
    });
    let events = Arc::new(WebSocketWeb3::connect(config.websocket.clone(), Some(on_end)).await?);

    let notifier: Arc<dyn Notifier> = match &config.notifier_url {
        Some(url) => Arc::new(HttpNotifier::new(url.clone(), config.http.timeout())?),
        None => Arc::new(LogNotifier),
    };

    let settings = OracleSettings {
        dns_address: config.dns()?,
        agent_challenge_views: config.agent_challenge_views,
        relisten: config.relisten,
    };
    let oracle = Oracle::start(reads, events, settings, notifier).await?;
    info!(
        organizations = oracle.organizations().len(),
        "Oracle is running"
    );
    oracle.run(resets, shutdown).await
}
