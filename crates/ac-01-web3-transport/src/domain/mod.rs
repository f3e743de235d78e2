//! Domain layer: ABI glue, configuration and errors.

pub mod abi;
pub mod config;
pub mod error;

pub use abi::AbiLookup;
pub use config::{ConfigError, HttpOptions, ReconnectOptions, WebSocketOptions};
pub use error::{AbiError, RpcErrorObject, TransportError, Web3Error};
