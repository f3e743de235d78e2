//! Ports: the capability interfaces the rest of the system codes against.

pub mod chain;
pub mod connection;

pub use chain::{ChainClient, LogSubscription};
pub use connection::Web3Connection;
