//! Persistent connection and its reset manager.
//!
//! [`WebSocketWeb3`] owns the live session behind an indirection that every
//! contract handle reads through. Within a session, alloy's pubsub service
//! re-establishes a dropped socket and re-issues the active subscriptions
//! under their original local ids; node-assigned ids never leave it.
//!
//! When the service gives up, the session has ended: the end callback fires
//! once and [`WebSocketWeb3::reset_web_socket`] swaps in a fresh session.
//! Subscriptions opened on the old session are gone, so re-registering
//! listeners after a reset is the caller's job.
//!
//! ```text
//! socket drop ──► alloy reconnect ──ok──► same session, same local ids
//!                                 └─fail─► streams end ──► on_end()
//!                                                  caller ──► reset_web_socket()
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::primitives::{Bytes, TxHash, B256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::pubsub::PubSubFrontend;
use alloy::rpc::types::{Filter, Log, TransactionReceipt, TransactionRequest};
use alloy::transports::ws::WsConnect;
use async_trait::async_trait;
use dashmap::DashSet;
use futures_util::{future, stream, StreamExt};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::adapters::provider::ProviderChain;
use crate::domain::config::WebSocketOptions;
use crate::domain::error::TransportError;
use crate::ports::chain::{ChainClient, LogSubscription};
use crate::ports::connection::Web3Connection;

/// Invoked once when a session ends without having been closed on purpose.
pub type EndCallback = Arc<dyn Fn() + Send + Sync>;

/// End-of-life state of one session, shared with its log streams.
struct Liveness {
    url: String,
    ended: AtomicBool,
    closed: AtomicBool,
    /// Local ids cancelled through this session; their streams ending is
    /// not a connection loss.
    cancelled: DashSet<B256>,
    on_end: Option<EndCallback>,
}

impl Liveness {
    fn end(&self) {
        if self.ended.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.closed.load(Ordering::SeqCst) {
            debug!(url = %self.url, "WebSocket session closed");
            return;
        }
        warn!(url = %self.url, "WebSocket session ended");
        if let Some(on_end) = &self.on_end {
            on_end();
        }
    }

    fn observe<T>(&self, result: Result<T, TransportError>) -> Result<T, TransportError> {
        if matches!(&result, Err(e) if e.is_closed()) {
            self.end();
        }
        result
    }
}

/// One alloy WebSocket provider and its liveness.
struct Session {
    chain: ProviderChain<PubSubFrontend>,
    liveness: Arc<Liveness>,
}

impl Session {
    async fn open(
        options: &WebSocketOptions,
        on_end: Option<EndCallback>,
    ) -> Result<Self, TransportError> {
        let connect = ProviderBuilder::new().on_ws(WsConnect::new(options.url.clone()));
        let provider: RootProvider<PubSubFrontend> =
            tokio::time::timeout(options.timeout(), connect)
                .await
                .map_err(|_| TransportError::Timeout {
                    url: options.url.clone(),
                    timeout_ms: options.timeout_ms,
                })?
                .map_err(|e| TransportError::from_rpc(&options.url, e))?;

        Ok(Self {
            chain: ProviderChain::new(provider, options.url.clone(), options.timeout_ms),
            liveness: Arc::new(Liveness {
                url: options.url.clone(),
                ended: AtomicBool::new(false),
                closed: AtomicBool::new(false),
                cancelled: DashSet::new(),
                on_end,
            }),
        })
    }

    fn has_ended(&self) -> bool {
        self.liveness.ended.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.liveness.closed.store(true, Ordering::SeqCst);
        self.liveness.end();
    }
}

#[async_trait]
impl ChainClient for Session {
    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, TransportError> {
        self.liveness.observe(self.chain.call(request).await)
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, TransportError> {
        self.liveness.observe(self.chain.estimate_gas(request).await)
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash, TransportError> {
        self.liveness
            .observe(self.chain.send_transaction(request).await)
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, TransportError> {
        self.liveness
            .observe(self.chain.transaction_receipt(hash).await)
    }

    async fn subscribe_logs(&self, filter: &Filter) -> Result<LogSubscription, TransportError> {
        let subscription = self.liveness.observe(
            self.chain
                .provider()
                .subscribe_logs(filter)
                .await
                .map_err(|e| self.chain.classify(e)),
        )?;
        let id = *subscription.local_id();
        debug!(url = %self.liveness.url, subscription = %id, "Subscribed to logs");

        let liveness = self.liveness.clone();
        let on_close = stream::once(async move {
            if !liveness.cancelled.contains(&id) {
                liveness.end();
            }
        })
        .filter_map(|()| future::ready(None::<Log>));

        Ok(LogSubscription {
            id,
            logs: subscription.into_stream().chain(on_close).boxed(),
        })
    }

    async fn unsubscribe(&self, id: B256) -> Result<(), TransportError> {
        self.liveness.cancelled.insert(id);
        let result = self
            .chain
            .provider()
            .client()
            .transport()
            .unsubscribe(id)
            .map_err(|e| self.chain.classify(e));
        debug!(url = %self.liveness.url, subscription = %id, "Unsubscribed from logs");
        self.liveness.observe(result)
    }

    fn endpoint(&self) -> String {
        self.chain.url().to_string()
    }
}

/// Open a session, retrying per the reconnect policy.
async fn open_with_retry(
    options: &WebSocketOptions,
    on_end: Option<EndCallback>,
) -> Result<Session, TransportError> {
    let policy = &options.reconnect;
    let mut attempt = 1;
    loop {
        match Session::open(options, on_end.clone()).await {
            Ok(session) => return Ok(session),
            Err(e) => {
                let timed_out = matches!(e, TransportError::Timeout { .. });
                if attempt >= policy.max_attempts || (timed_out && !policy.on_timeout) {
                    return Err(e);
                }
                warn!(
                    url = %options.url,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "WebSocket connection attempt failed"
                );
                attempt += 1;
                tokio::time::sleep(policy.delay()).await;
            }
        }
    }
}

/// Client that always forwards to the current session.
struct Swappable {
    current: RwLock<Arc<Session>>,
    options: WebSocketOptions,
    on_end: Option<EndCallback>,
    resetting: tokio::sync::Mutex<()>,
}

impl Swappable {
    fn current(&self) -> Arc<Session> {
        self.current.read().clone()
    }
}

#[async_trait]
impl ChainClient for Swappable {
    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, TransportError> {
        self.current().call(request).await
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, TransportError> {
        self.current().estimate_gas(request).await
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash, TransportError> {
        self.current().send_transaction(request).await
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, TransportError> {
        self.current().transaction_receipt(hash).await
    }

    async fn subscribe_logs(&self, filter: &Filter) -> Result<LogSubscription, TransportError> {
        self.current().subscribe_logs(filter).await
    }

    async fn unsubscribe(&self, id: B256) -> Result<(), TransportError> {
        self.current().unsubscribe(id).await
    }

    fn endpoint(&self) -> String {
        self.options.url.clone()
    }
}

/// Chain connection over a WebSocket that can be reset after it ends.
#[derive(Clone)]
pub struct WebSocketWeb3 {
    inner: Arc<Swappable>,
}

impl WebSocketWeb3 {
    /// Open the first session. `on_end` is handed to every session this
    /// connection creates and fires when one of them ends.
    pub async fn connect(
        options: WebSocketOptions,
        on_end: Option<EndCallback>,
    ) -> Result<Self, TransportError> {
        options
            .validate()
            .map_err(|e| TransportError::Setup(e.to_string()))?;
        info!(url = %options.url, "Opening WebSocket provider");
        let session = open_with_retry(&options, on_end.clone()).await?;
        Ok(Self {
            inner: Arc::new(Swappable {
                current: RwLock::new(Arc::new(session)),
                options,
                on_end,
                resetting: tokio::sync::Mutex::new(()),
            }),
        })
    }

    /// Replace the session if, and only if, the current one has ended.
    ///
    /// Returns whether a swap happened.
    pub async fn reset_web_socket(&self) -> Result<bool, TransportError> {
        let _guard = self.inner.resetting.lock().await;
        if !self.inner.current().has_ended() {
            debug!(url = %self.inner.options.url, "Provider still alive, reset skipped");
            return Ok(false);
        }
        let session = open_with_retry(&self.inner.options, self.inner.on_end.clone()).await?;
        *self.inner.current.write() = Arc::new(session);
        info!(url = %self.inner.options.url, "WebSocket provider reset");
        Ok(true)
    }

    pub fn has_ended(&self) -> bool {
        self.inner.current().has_ended()
    }

    pub fn is_connected(&self) -> bool {
        !self.has_ended()
    }

    /// Stop reporting the current session's end. The socket is released
    /// with the last handle to it.
    pub fn close(&self) {
        self.inner.current().close();
    }
}

impl Web3Connection for WebSocketWeb3 {
    fn client(&self) -> Arc<dyn ChainClient> {
        self.inner.clone()
    }
}
