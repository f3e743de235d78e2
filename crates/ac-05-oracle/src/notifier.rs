//! Delivery of issued challenges to the agent's device.
//!
//! Best effort: a failed notification is logged and dropped. The challenge
//! stays pending on chain either way.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared_types::IssuedChallenge;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::OracleError;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, challenge: &IssuedChallenge) -> Result<(), OracleError>;
}

/// Writes every issued challenge to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, challenge: &IssuedChallenge) -> Result<(), OracleError> {
        info!(
            organization_id = %challenge.organization_id,
            policy_id = %challenge.policy_id,
            action_id = %challenge.action_id,
            device_id = %challenge.device_id,
            device_token = %challenge.device_token,
            challenge_id = %challenge.challenge_id,
            challenge_title = %challenge.title,
            challenge_message = %challenge.message,
            "Challenge issued"
        );
        Ok(())
    }
}

/// POSTs each issued challenge as JSON to a push service.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: Client,
    url: String,
}

impl HttpNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Config(format!("notifier client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, challenge: &IssuedChallenge) -> Result<(), OracleError> {
        let failed = |reason: String| OracleError::Notify {
            challenge: challenge.challenge_id.to_string(),
            reason,
        };

        let response = self
            .client
            .post(&self.url)
            .json(challenge)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("push service answered {}", status)));
        }
        debug!(challenge_id = %challenge.challenge_id, %status, "Notification created");
        Ok(())
    }
}

/// Hand every received challenge to `notifier`, one at a time, until the
/// channel closes.
pub async fn dispatch(notifier: Arc<dyn Notifier>, mut issued: mpsc::UnboundedReceiver<IssuedChallenge>) {
    while let Some(challenge) = issued.recv().await {
        if let Err(e) = notifier.notify(&challenge).await {
            warn!(error = %e, "Dropping challenge notification");
        }
    }
    debug!("Notification dispatch stopped");
}
