//! AC-01 Web3 Transport - JSON-RPC connections to a chain node.
//!
//! Two variants share one capability interface ([`Web3Connection`]), both
//! driven by alloy root providers:
//!
//! - [`HttpWeb3`]: stateless request/response over a keep-alive HTTP client.
//!   Used for queries and for transactions where the caller awaits the
//!   receipt.
//! - [`WebSocketWeb3`]: one persistent pubsub session that can be reset
//!   once it ends. Required for contract event subscriptions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        WEB3 TRANSPORT (ac-01)                     │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   Contract handle  ── call / send / deploy / subscribe_event     │
//! │         │  json_abi + dyn_abi                                     │
//! │         ▼  Arc<dyn ChainClient>                                   │
//! │  ┌────────────────────┐     ┌──────────────────────────────┐      │
//! │  │ HttpChain          │     │ Swappable (RwLock<Session>)  │      │
//! │  │  RootProvider<Http>│     │   └── RootProvider<PubSub>   │      │
//! │  └────────────────────┘     └──────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Failure semantics
//!
//! Connection-level errors surface as [`TransportError`] and are not
//! retried here. A dropped socket is re-established inside alloy's pubsub
//! service; once that fails the session is left ended and the injected end
//! callback fires. Resetting it is [`WebSocketWeb3::reset_web_socket`].
//!
//! # Usage
//!
//! ```ignore
//! use ac_01_web3_transport::{HttpOptions, HttpWeb3, TxOptions, Web3Connection};
//!
//! let web3 = HttpWeb3::new(HttpOptions::default())?;
//! let contract = web3.contract(address, abi);
//! let last = contract.call("lastChallengeId", &[], TxOptions::default()).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod contract;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use adapters::{EndCallback, HttpChain, HttpWeb3, WebSocketWeb3};
pub use contract::{Contract, EventLog, EventStream, ReceiptPolling, TxOptions};
pub use domain::*;
pub use ports::{ChainClient, LogSubscription, Web3Connection};

pub use alloy::dyn_abi::DynSolValue;
pub use alloy::json_abi::JsonAbi;
pub use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
pub use alloy::rpc::types::{Filter, Log, TransactionReceipt, TransactionRequest};
