//! Gateway-wide settings, set once at process start.

use std::time::Duration;

use ac_01_web3_transport::ReceiptPolling;
use serde::{Deserialize, Serialize};

/// Gas ceiling applied to every call and send.
pub const MAXIMUM_GAS: u64 = 7_500_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub maximum_gas: u64,
    pub receipt_poll_interval_ms: u64,
    pub receipt_max_attempts: u32,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        let polling = ReceiptPolling::default();
        Self {
            maximum_gas: MAXIMUM_GAS,
            receipt_poll_interval_ms: polling.interval.as_millis() as u64,
            receipt_max_attempts: polling.max_attempts,
        }
    }
}

impl GatewaySettings {
    pub fn receipt_polling(&self) -> ReceiptPolling {
        ReceiptPolling {
            interval: Duration::from_millis(self.receipt_poll_interval_ms),
            max_attempts: self.receipt_max_attempts,
        }
    }
}
