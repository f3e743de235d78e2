//! AC-02 Contract Gateway - the sole path from facades to deployed contracts.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     CONTRACT GATEWAY (ac-02)                      │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  Facade (ac-03)                                                   │
//! │     │  SolidityContract::call / send (Vec<DynSolValue>, handler)  │
//! │     ▼                                                             │
//! │  ContractEnvironment ── connection, sender, sources, gas ceiling  │
//! │     │                                                             │
//! │     ▼                                                             │
//! │  ac-01 Contract handle ──► ChainClient (alloy)                    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure leaving the gateway is rendered as
//! `<Name> @ <address> <method> ( <a1>, <a2> ) failed. <cause>`.
//! Gas ceiling on calls and sends is [`settings::MAXIMUM_GAS`] unless
//! overridden; deployments pad their own estimate by 20 %.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod deploy;
pub mod environment;
pub mod errors;
pub mod gateway;
pub mod settings;
pub mod sources;

#[cfg(test)]
mod testing;

pub use deploy::{deploy_contract, deploy_facade, pad_gas, Facade};
pub use environment::ContractEnvironment;
pub use errors::{
    ContractDeploymentError, ContractError, ContractInteractionError, SourceError,
};
pub use gateway::SolidityContract;
pub use settings::{GatewaySettings, MAXIMUM_GAS};
pub use sources::ContractSources;

pub use ac_01_web3_transport::DynSolValue;
