//! Oracle configuration from environment variables.

use std::env;
use std::path::PathBuf;

use ac_01_web3_transport::{HttpOptions, WebSocketOptions};
use ac_02_contract_gateway::GatewaySettings;
use serde::{Deserialize, Serialize};
use shared_types::EthereumAddress;

use crate::errors::OracleError;

/// Everything the oracle binary needs to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Read path: DNS and organization lookups
    pub http: HttpOptions,
    /// Event path: contract subscriptions
    pub websocket: WebSocketOptions,
    /// Account that signs every send
    pub sender: String,
    /// Address of the deployed DomainNameSystem contract
    pub dns_address: String,
    /// Directory holding `<Name>.abi` / `<Name>.bin`
    pub contracts_dir: PathBuf,
    pub gateway: GatewaySettings,
    /// Where issued challenges are POSTed; log only when unset
    pub notifier_url: Option<String>,
    /// Also resolve each organization's agent-challenges view at startup
    pub agent_challenge_views: bool,
    pub relisten: RelistenPolicy,
    pub log_level: String,
    pub json_logs: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            http: HttpOptions::default(),
            websocket: WebSocketOptions::default(),
            sender: String::new(),
            dns_address: String::new(),
            contracts_dir: PathBuf::from("contracts"),
            gateway: GatewaySettings::default(),
            notifier_url: None,
            agent_challenge_views: false,
            relisten: RelistenPolicy::default(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Attempts to register listeners again after the WebSocket was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelistenPolicy {
    pub attempts: u32,
    pub delay_ms: u64,
}

impl Default for RelistenPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay_ms: 7_500,
        }
    }
}

impl OracleConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AC_ORACLE_HTTP_URL`: node HTTP endpoint (default: http://localhost:8545)
    /// - `AC_ORACLE_WS_URL`: node WebSocket endpoint (default: ws://localhost:8545)
    /// - `AC_ORACLE_SENDER`: funded sender account (required)
    /// - `AC_ORACLE_DNS_ADDRESS`: DomainNameSystem contract address (required)
    /// - `AC_ORACLE_CONTRACTS_DIR`: ABI/BIN directory (default: contracts)
    /// - `AC_ORACLE_MAXIMUM_GAS`: gas ceiling per call (default: 7500000)
    /// - `AC_ORACLE_NOTIFIER_URL`: push endpoint for issued challenges
    /// - `AC_ORACLE_AGENT_CHALLENGE_VIEWS`: load agent-challenges views (default: false)
    /// - `AC_ORACLE_LOG_LEVEL` or `RUST_LOG`: log filter (default: info)
    /// - `AC_ORACLE_JSON_LOGS`: JSON formatted logs (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`OracleConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("AC_ORACLE_HTTP_URL") {
            config.http.url = url;
        }
        if let Some(url) = lookup("AC_ORACLE_WS_URL") {
            config.websocket.url = url;
        }
        if let Some(sender) = lookup("AC_ORACLE_SENDER") {
            config.sender = sender;
        }
        if let Some(address) = lookup("AC_ORACLE_DNS_ADDRESS") {
            config.dns_address = address;
        }
        if let Some(dir) = lookup("AC_ORACLE_CONTRACTS_DIR") {
            config.contracts_dir = PathBuf::from(dir);
        }
        if let Some(gas) = lookup("AC_ORACLE_MAXIMUM_GAS").and_then(|v| v.parse().ok()) {
            config.gateway.maximum_gas = gas;
        }
        config.notifier_url = lookup("AC_ORACLE_NOTIFIER_URL").filter(|v| !v.trim().is_empty());
        config.agent_challenge_views = lookup("AC_ORACLE_AGENT_CHALLENGE_VIEWS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);
        config.log_level = lookup("AC_ORACLE_LOG_LEVEL")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());
        config.json_logs = lookup("AC_ORACLE_JSON_LOGS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        config
    }

    pub fn validate(&self) -> Result<(), OracleError> {
        self.http.validate()?;
        self.websocket.validate()?;
        self.sender_address()?;
        self.dns()?;
        if self.gateway.maximum_gas == 0 {
            return Err(OracleError::Config("maximum_gas cannot be 0".into()));
        }
        if let Some(url) = &self.notifier_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(OracleError::Config(format!("notifier url {}", url)));
            }
        }
        if self.relisten.attempts == 0 {
            return Err(OracleError::Config("relisten attempts cannot be 0".into()));
        }
        Ok(())
    }

    pub fn sender_address(&self) -> Result<EthereumAddress, OracleError> {
        EthereumAddress::of(self.sender.as_str()).map_err(|source| OracleError::Address {
            field: "sender",
            source,
        })
    }

    pub fn dns(&self) -> Result<EthereumAddress, OracleError> {
        EthereumAddress::of(self.dns_address.as_str()).map_err(|source| OracleError::Address {
            field: "dns address",
            source,
        })
    }
}
