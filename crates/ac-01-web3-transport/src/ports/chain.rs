//! Typed chain access port.

use alloy::primitives::{Bytes, TxHash, B256};
use alloy::rpc::types::{Filter, Log, TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::domain::error::TransportError;

/// A live log subscription.
///
/// The stream ends when the subscription is cancelled or the connection
/// behind it is gone for good.
pub struct LogSubscription {
    /// Id used to cancel this registration, stable across in-session
    /// reconnects.
    pub id: B256,
    pub logs: BoxStream<'static, Log>,
}

impl std::fmt::Debug for LogSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSubscription").field("id", &self.id).finish()
    }
}

/// The node operations contract handles are built on.
///
/// Connection-level failures surface as [`TransportError`] and are never
/// retried by callers of this trait.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// `eth_call` against the latest block.
    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, TransportError>;

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, TransportError>;

    /// Submit a transaction signed by the node; returns its hash.
    async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash, TransportError>;

    /// `None` until the transaction is mined.
    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, TransportError>;

    /// Push subscription to logs matching `filter`. Request/response
    /// connections cannot receive unsolicited notifications.
    async fn subscribe_logs(&self, filter: &Filter) -> Result<LogSubscription, TransportError> {
        let _ = filter;
        Err(TransportError::SubscriptionsUnsupported(self.endpoint()))
    }

    /// Cancel a subscription opened by [`ChainClient::subscribe_logs`].
    async fn unsubscribe(&self, id: B256) -> Result<(), TransportError> {
        let _ = id;
        Err(TransportError::SubscriptionsUnsupported(self.endpoint()))
    }

    /// Endpoint description used in logs and errors.
    fn endpoint(&self) -> String;
}
