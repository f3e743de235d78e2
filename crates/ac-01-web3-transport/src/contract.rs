//! Contract handles: an address plus an ABI bound to a chain client.

use std::sync::Arc;
use std::time::Duration;

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::{Event, JsonAbi};
use alloy::primitives::{Address, Bytes, TxHash, TxKind, B256};
use alloy::rpc::types::{Filter, Log, TransactionInput, TransactionReceipt, TransactionRequest};
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::domain::abi::{self, AbiLookup};
use crate::domain::error::Web3Error;
use crate::ports::chain::ChainClient;

/// Per-invocation transaction options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOptions {
    pub from: Option<Address>,
    pub gas: Option<u64>,
}

/// How long to wait for a submitted transaction to be mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolling {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_attempts: 750,
        }
    }
}

/// A contract reachable through one chain client.
///
/// Cheap to clone; the ABI and client are shared.
#[derive(Clone)]
pub struct Contract {
    client: Arc<dyn ChainClient>,
    address: Option<Address>,
    abi: Arc<JsonAbi>,
    polling: ReceiptPolling,
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("endpoint", &self.client.endpoint())
            .field("address", &self.address)
            .finish()
    }
}

impl Contract {
    pub fn at(client: Arc<dyn ChainClient>, address: Address, abi: Arc<JsonAbi>) -> Self {
        Self {
            client,
            address: Some(address),
            abi,
            polling: ReceiptPolling::default(),
        }
    }

    pub fn for_deployment(client: Arc<dyn ChainClient>, abi: Arc<JsonAbi>) -> Self {
        Self {
            client,
            address: None,
            abi,
            polling: ReceiptPolling::default(),
        }
    }

    pub fn with_receipt_polling(mut self, polling: ReceiptPolling) -> Self {
        self.polling = polling;
        self
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    fn require_address(&self) -> Result<Address, Web3Error> {
        self.address.ok_or(Web3Error::NoAddress)
    }

    fn request(&self, to: Option<Address>, data: Vec<u8>, options: TxOptions) -> TransactionRequest {
        TransactionRequest {
            from: options.from,
            to: to.map(TxKind::Call),
            gas: options.gas,
            input: TransactionInput::new(Bytes::from(data)),
            ..Default::default()
        }
    }

    // =========================================================================
    // CALLS AND TRANSACTIONS
    // =========================================================================

    /// Read-only invocation (`eth_call`); returns the JSON projection of the
    /// decoded outputs.
    pub async fn call(
        &self,
        method: &str,
        args: &[DynSolValue],
        options: TxOptions,
    ) -> Result<Value, Web3Error> {
        let function = self.abi.function_with_arity(method, args.len())?;
        let request = self.request(
            Some(self.require_address()?),
            abi::encode_call(function, args)?,
            options,
        );
        let data = self.client.call(&request).await?;
        Ok(abi::decode_output_json(function, &data)?)
    }

    /// Mutating invocation (`eth_sendTransaction`); waits for the receipt.
    pub async fn send(
        &self,
        method: &str,
        args: &[DynSolValue],
        options: TxOptions,
    ) -> Result<TransactionReceipt, Web3Error> {
        let function = self.abi.function_with_arity(method, args.len())?;
        let request = self.request(
            Some(self.require_address()?),
            abi::encode_call(function, args)?,
            options,
        );
        self.submit(request).await
    }

    /// `eth_estimateGas` for deploying `bytecode` with constructor `args`.
    pub async fn estimate_deployment(
        &self,
        bytecode: &[u8],
        args: &[DynSolValue],
        from: Option<Address>,
    ) -> Result<u64, Web3Error> {
        let request = self.request(
            None,
            abi::encode_deployment(&self.abi, bytecode, args)?,
            TxOptions { from, gas: None },
        );
        Ok(self.client.estimate_gas(&request).await?)
    }

    /// Submit a deployment and return a handle bound to the new address.
    pub async fn deploy(
        &self,
        bytecode: &[u8],
        args: &[DynSolValue],
        options: TxOptions,
    ) -> Result<(Contract, TransactionReceipt), Web3Error> {
        let request = self.request(
            None,
            abi::encode_deployment(&self.abi, bytecode, args)?,
            options,
        );
        let receipt = self.submit(request).await?;
        let address = receipt
            .contract_address
            .ok_or_else(|| Web3Error::MissingContractAddress {
                transaction_hash: receipt.transaction_hash.to_string(),
            })?;
        let deployed = Contract {
            client: self.client.clone(),
            address: Some(address),
            abi: self.abi.clone(),
            polling: self.polling,
        };
        Ok((deployed, receipt))
    }

    async fn submit(&self, request: TransactionRequest) -> Result<TransactionReceipt, Web3Error> {
        let hash = self.client.send_transaction(request).await?;
        debug!(transaction_hash = %hash, "Transaction submitted");

        let receipt = self.wait_for_receipt(hash).await?;
        if !receipt.status() {
            return Err(Web3Error::Reverted {
                transaction_hash: hash.to_string(),
            });
        }
        Ok(receipt)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TransactionReceipt, Web3Error> {
        for attempt in 0..self.polling.max_attempts {
            if let Some(receipt) = self.client.transaction_receipt(hash).await? {
                trace!(transaction_hash = %hash, attempt, "Receipt available");
                return Ok(receipt);
            }
            tokio::time::sleep(self.polling.interval).await;
        }
        Err(Web3Error::ReceiptTimeout {
            transaction_hash: hash.to_string(),
            attempts: self.polling.max_attempts,
        })
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Subscribe to every emission of `event_name` by this contract.
    pub async fn subscribe_event(&self, event_name: &str) -> Result<EventStream, Web3Error> {
        let event = self.abi.event_named(event_name)?.clone();
        let filter = Filter::new()
            .address(self.require_address()?)
            .event_signature(event.selector());
        let subscription = self.client.subscribe_logs(&filter).await?;
        debug!(
            event = %event.name,
            subscription = %subscription.id,
            "Subscribed to contract event"
        );
        Ok(EventStream {
            id: subscription.id,
            event,
            logs: subscription.logs,
        })
    }

    /// Cancel a subscription opened by [`Contract::subscribe_event`].
    pub async fn unsubscribe(&self, id: B256) -> Result<(), Web3Error> {
        Ok(self.client.unsubscribe(id).await?)
    }
}

/// A decoded contract event emission.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLog {
    pub event: String,
    /// Decoded arguments keyed by input name.
    pub return_values: Map<String, Value>,
    pub log: Log,
}

/// Stream of decoded emissions for one event kind.
pub struct EventStream {
    pub id: B256,
    event: Event,
    logs: BoxStream<'static, Log>,
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("id", &self.id)
            .field("event", &self.event.name)
            .finish()
    }
}

impl EventStream {
    pub fn event_name(&self) -> &str {
        &self.event.name
    }

    /// Next emission in delivery order. `None` once the subscription is
    /// cancelled or its connection has ended.
    ///
    /// An `Err` item reports a log that does not decode against the event;
    /// the stream stays usable afterwards.
    pub async fn next(&mut self) -> Option<Result<EventLog, Web3Error>> {
        let log = self.logs.next().await?;
        Some(self.decode(log))
    }

    fn decode(&self, log: Log) -> Result<EventLog, Web3Error> {
        let data = &log.inner.data;
        let return_values = abi::decode_event(&self.event, data.topics(), &data.data)?;
        Ok(EventLog {
            event: self.event.name.clone(),
            return_values,
            log,
        })
    }
}
