//! Request/response connection over HTTP.
//!
//! Stateless: every request is one POST on a keep-alive reqwest client with
//! a fixed timeout and fixed default headers, driven by an alloy root
//! provider. Cannot carry subscriptions.

use std::sync::Arc;

use alloy::primitives::{Bytes, TxHash};
use alloy::providers::{ProviderBuilder, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::http::{Client, Http};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::info;

use crate::adapters::provider::ProviderChain;
use crate::domain::config::HttpOptions;
use crate::domain::error::TransportError;
use crate::ports::chain::ChainClient;
use crate::ports::connection::Web3Connection;

/// Chain client over HTTP.
pub struct HttpChain {
    inner: ProviderChain<Http<Client>>,
}

impl HttpChain {
    pub fn new(options: HttpOptions) -> Result<Self, TransportError> {
        let url = options
            .url
            .parse::<reqwest::Url>()
            .map_err(|e| TransportError::Setup(format!("{}: {}", options.url, e)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Setup(format!("header {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::Setup(format!("header {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .timeout(options.timeout())
            .default_headers(headers);
        builder = if options.keep_alive {
            builder.tcp_keepalive(Some(options.timeout()))
        } else {
            builder.pool_max_idle_per_host(0)
        };
        let client = builder
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        let transport = Http::with_client(client, url);
        let provider: RootProvider<Http<Client>> =
            ProviderBuilder::new().on_client(RpcClient::new(transport, false));
        info!(url = %options.url, "HTTP provider ready");

        Ok(Self {
            inner: ProviderChain::new(provider, options.url.clone(), options.timeout_ms),
        })
    }
}

#[async_trait]
impl ChainClient for HttpChain {
    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, TransportError> {
        self.inner.call(request).await
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, TransportError> {
        self.inner.estimate_gas(request).await
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash, TransportError> {
        self.inner.send_transaction(request).await
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, TransportError> {
        self.inner.transaction_receipt(hash).await
    }

    fn endpoint(&self) -> String {
        self.inner.url().to_string()
    }
}

/// Chain connection over HTTP.
#[derive(Clone)]
pub struct HttpWeb3 {
    chain: Arc<HttpChain>,
}

impl HttpWeb3 {
    pub fn new(options: HttpOptions) -> Result<Self, TransportError> {
        Ok(Self {
            chain: Arc::new(HttpChain::new(options)?),
        })
    }
}

impl Web3Connection for HttpWeb3 {
    fn client(&self) -> Arc<dyn ChainClient> {
        self.chain.clone()
    }
}
