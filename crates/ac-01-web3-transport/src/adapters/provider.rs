//! Request/response operations shared by both connection variants.

use alloy::primitives::{Bytes, TxHash};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::{RpcError, Transport, TransportErrorKind};
use tracing::{debug, trace};

use crate::domain::error::TransportError;

/// An alloy root provider plus the endpoint facts its errors are reported
/// against.
pub(crate) struct ProviderChain<T> {
    provider: RootProvider<T>,
    url: String,
    timeout_ms: u64,
}

impl<T: Transport + Clone> ProviderChain<T> {
    pub(crate) fn new(provider: RootProvider<T>, url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            provider,
            url: url.into(),
            timeout_ms,
        }
    }

    pub(crate) fn provider(&self) -> &RootProvider<T> {
        &self.provider
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    pub(crate) async fn call(&self, request: &TransactionRequest) -> Result<Bytes, TransportError> {
        trace!(url = %self.url, to = ?request.to, "eth_call");
        self.provider
            .call(request)
            .await
            .map_err(|e| self.classify(e))
    }

    pub(crate) async fn estimate_gas(
        &self,
        request: &TransactionRequest,
    ) -> Result<u64, TransportError> {
        trace!(url = %self.url, "eth_estimateGas");
        self.provider
            .estimate_gas(request)
            .await
            .map_err(|e| self.classify(e))
    }

    pub(crate) async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TxHash, TransportError> {
        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| self.classify(e))?;
        let hash = *pending.tx_hash();
        debug!(url = %self.url, transaction_hash = %hash, "eth_sendTransaction");
        Ok(hash)
    }

    pub(crate) async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, TransportError> {
        self.provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| self.classify(e))
    }

    /// Map an alloy failure, telling client-side timeouts apart from other
    /// transport trouble.
    pub(crate) fn classify(&self, error: RpcError<TransportErrorKind>) -> TransportError {
        if let RpcError::Transport(TransportErrorKind::Custom(source)) = &error {
            let timed_out = source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(|e| e.is_timeout());
            if timed_out {
                return TransportError::Timeout {
                    url: self.url.clone(),
                    timeout_ms: self.timeout_ms,
                };
            }
        }
        TransportError::from_rpc(&self.url, error)
    }
}
