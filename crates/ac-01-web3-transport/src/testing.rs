//! Scripted chain client and realistic receipt/log builders for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::rpc::types::{Log, TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use crate::domain::error::TransportError;
use crate::ports::chain::ChainClient;
use crate::ports::connection::Web3Connection;

/// One canned node answer.
#[derive(Debug, Clone)]
pub enum Reply {
    Data(Bytes),
    Gas(u64),
    Hash(TxHash),
    Receipt(Option<TransactionReceipt>),
}

/// Replays canned replies in order and records every request.
pub struct Scripted {
    replies: Mutex<VecDeque<Result<Reply, TransportError>>>,
    seen: Mutex<Vec<(&'static str, TransactionRequest)>>,
}

impl Scripted {
    pub fn new(replies: Vec<Result<Reply, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Requests seen so far, by method name. Receipt polls are recorded
    /// with an empty request.
    pub fn seen(&self) -> Vec<(&'static str, TransactionRequest)> {
        self.seen.lock().clone()
    }

    fn next(&self, method: &'static str, request: TransactionRequest) -> Result<Reply, TransportError> {
        self.seen.lock().push((method, request));
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::InvalidResponse("script exhausted".into())))
    }
}

fn unexpected(method: &str, reply: Reply) -> TransportError {
    TransportError::InvalidResponse(format!("scripted {:?} cannot answer {}", reply, method))
}

#[async_trait]
impl ChainClient for Scripted {
    async fn call(&self, request: &TransactionRequest) -> Result<Bytes, TransportError> {
        match self.next("eth_call", request.clone())? {
            Reply::Data(data) => Ok(data),
            other => Err(unexpected("eth_call", other)),
        }
    }

    async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, TransportError> {
        match self.next("eth_estimateGas", request.clone())? {
            Reply::Gas(gas) => Ok(gas),
            other => Err(unexpected("eth_estimateGas", other)),
        }
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash, TransportError> {
        match self.next("eth_sendTransaction", request)? {
            Reply::Hash(hash) => Ok(hash),
            other => Err(unexpected("eth_sendTransaction", other)),
        }
    }

    async fn transaction_receipt(
        &self,
        _hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, TransportError> {
        match self.next("eth_getTransactionReceipt", TransactionRequest::default())? {
            Reply::Receipt(receipt) => Ok(receipt),
            other => Err(unexpected("eth_getTransactionReceipt", other)),
        }
    }

    fn endpoint(&self) -> String {
        "scripted".into()
    }
}

/// A [`Web3Connection`] over a [`Scripted`] client.
pub struct ScriptedConnection(pub Arc<Scripted>);

impl Web3Connection for ScriptedConnection {
    fn client(&self) -> Arc<dyn ChainClient> {
        self.0.clone()
    }
}

pub fn transaction_hash(n: u64) -> TxHash {
    B256::left_padding_from(&n.to_be_bytes())
}

/// A mined receipt as a development node reports it.
pub fn receipt(
    hash: TxHash,
    succeeded: bool,
    contract_address: Option<Address>,
    logs: Vec<Log>,
) -> TransactionReceipt {
    serde_json::from_value(json!({
        "type": "0x0",
        "status": if succeeded { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "logs": logs,
        "transactionHash": hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": "0x1",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x1",
        "from": Address::repeat_byte(0xf1),
        "to": if contract_address.is_some() { None } else { Some(Address::repeat_byte(0x0c)) },
        "contractAddress": contract_address,
    }))
    .expect("receipt fixture is well formed")
}

/// A log emitted by `address` in block `block`.
pub fn log(
    address: Address,
    topics: Vec<B256>,
    data: Vec<u8>,
    transaction: TxHash,
    block: u64,
    index: u64,
) -> Log {
    serde_json::from_value(json!({
        "address": address,
        "topics": topics,
        "data": Bytes::from(data),
        "blockHash": B256::left_padding_from(&block.to_be_bytes()),
        "blockNumber": format!("0x{:x}", block),
        "transactionHash": transaction,
        "transactionIndex": "0x0",
        "logIndex": format!("0x{:x}", index),
        "removed": false,
    }))
    .expect("log fixture is well formed")
}
