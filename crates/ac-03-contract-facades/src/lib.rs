//! AC-03 Contract Facades - one typed method per on-chain capability.
//!
//! Every method is exactly one gateway call or send plus argument lowering
//! (value types to ABI tokens) and result inflation (raw receipts to
//! validated records).
//!
//! ## Absence
//!
//! Contracts answer reads for unknown ids with a zeroed struct. A facade
//! checks the primary identifier for the zero sentinel before any other
//! validation and reports it as
//! `"<Facade> <method> ( <id> ) failed to return a value."`, so "missing"
//! and "invalid" stay distinguishable.
//!
//! ## Transitions
//!
//! `authorize` / `deny` / `remove` are single-argument sends. Facades keep
//! no cache: re-fetch to observe the new state.

#![warn(clippy::all)]
#![deny(unsafe_code)]

/// Facade struct bound to one contract, with `Facade` wiring and `destroy`.
macro_rules! facade {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            contract: ::ac_02_contract_gateway::SolidityContract,
        }

        impl ::ac_02_contract_gateway::Facade for $name {
            const NAME: &'static str = stringify!($name);

            fn at(
                env: &::ac_02_contract_gateway::ContractEnvironment,
                address: ::shared_types::EthereumAddress,
            ) -> Result<Self, ::ac_02_contract_gateway::ContractError> {
                Ok(Self {
                    contract: ::ac_02_contract_gateway::SolidityContract::new(
                        env,
                        <Self as ::ac_02_contract_gateway::Facade>::NAME,
                        address,
                    )?,
                })
            }
        }

        impl $name {
            pub fn contract(&self) -> &::ac_02_contract_gateway::SolidityContract {
                &self.contract
            }

            pub fn address(&self) -> &::shared_types::EthereumAddress {
                self.contract.address()
            }

            pub async fn destroy(&self) -> Result<(), ::ac_02_contract_gateway::ContractError> {
                self.contract.destroy().await
            }
        }
    };
}

pub mod access_control;
pub mod actions;
pub mod agents;
pub mod challenges;
pub mod devices;
pub mod domain_name_system;
pub mod organizations;
pub mod policies;
pub mod receipts;
pub mod view;

mod support;


pub use access_control::{AccessControl, Role};
pub use actions::Actions;
pub use agents::Agents;
pub use challenges::{Challenger, Challenges};
pub use devices::Devices;
pub use domain_name_system::DomainNameSystem;
pub use organizations::{Organization, Organizations};
pub use policies::{Policies, Policy};
pub use view::AgentChallengesView;

pub use ac_02_contract_gateway::Facade;
