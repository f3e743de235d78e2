//! Transport configuration with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Request/response transport options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpOptions {
    /// Node endpoint, e.g. `http://localhost:8545`
    pub url: String,
    /// Per-request timeout
    pub timeout_ms: u64,
    /// Keep the underlying TCP connection alive between requests
    pub keep_alive: bool,
    /// Headers attached to every request
    pub headers: Vec<(String, String)>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            url: "http://localhost:8545".to_string(),
            timeout_ms: 2_500,
            keep_alive: true,
            headers: vec![(
                "Access-Control-Allow-Origin".to_string(),
                "*".to_string(),
            )],
        }
    }
}

impl HttpOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Connection attempt policy of the persistent transport, applied when it
/// is first opened and on every reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectOptions {
    /// Pause between attempts
    pub delay_ms: u64,
    pub max_attempts: u32,
    /// Keep trying after an attempt timed out
    pub on_timeout: bool,
}

impl Default for ReconnectOptions {
    fn default() -> Self {
        Self {
            delay_ms: 7_500,
            max_attempts: 200,
            on_timeout: true,
        }
    }
}

impl ReconnectOptions {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Persistent (WebSocket) transport options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSocketOptions {
    /// Node endpoint, e.g. `ws://localhost:8545`
    pub url: String,
    /// Timeout of one connection attempt
    pub timeout_ms: u64,
    pub reconnect: ReconnectOptions,
}

impl Default for WebSocketOptions {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8545".to_string(),
            timeout_ms: 20_000,
            reconnect: ReconnectOptions::default(),
        }
    }
}

impl WebSocketOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.url.starts_with("ws://") || self.url.starts_with("wss://")) {
            return Err(ConfigError::InvalidUrl(self.url.clone()));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout("timeout_ms cannot be 0".into()));
        }
        if self.reconnect.max_attempts == 0 {
            return Err(ConfigError::InvalidTimeout(
                "reconnect.max_attempts cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

impl HttpOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.url.clone()));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout("timeout_ms cannot be 0".into()));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Invalid node URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
}
