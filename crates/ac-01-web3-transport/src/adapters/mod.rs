//! Adapters: alloy providers behind the ports.

pub mod http;
mod provider;
pub mod ws;

pub use http::{HttpChain, HttpWeb3};
pub use ws::{EndCallback, WebSocketWeb3};
