//! AC-04 Event Listeners - contract events as validated domain records.
//!
//! ```text
//!   node ──eth_subscribe("logs")──► EventStream ──decode──► return values
//!                                                              │
//!                          ┌───────────────────────────────────┘
//!                          ▼
//!            nested payload ("challenge", "action", ...) or flat arguments
//!                          │
//!                          ▼
//!            receipt ──inflate──► Challenge / Action / Agent / Device / IssuedChallenge
//!                          │
//!                          ▼
//!                   handler(record)   (delivery order)
//! ```
//!
//! One subscription per event kind, each drained by its own task. Errors on
//! a single emission are logged and the subscription keeps going. Event
//! payloads are inflated without the zero-sentinel check reads apply.
//!
//! ## Disconnects
//!
//! When the connection ends every stream closes and its task finishes.
//! Emissions that happen before listeners are registered again on a fresh
//! connection are lost: there is no replay from a block checkpoint.

#![warn(clippy::all)]
#![deny(unsafe_code)]

/// Listener struct bound to one contract name.
macro_rules! listener {
    ($(#[$meta:meta])* $name:ident => $contract:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            base: $crate::listener::ContractListener,
        }

        impl $name {
            pub const CONTRACT: &'static str = $contract;

            pub fn at(
                env: &::ac_02_contract_gateway::ContractEnvironment,
                address: ::shared_types::EthereumAddress,
            ) -> Result<Self, $crate::errors::ListenerError> {
                Ok(Self {
                    base: $crate::listener::ContractListener::new(env, Self::CONTRACT, address)?,
                })
            }

            pub fn address(&self) -> &::shared_types::EthereumAddress {
                self.base.address()
            }
        }
    };
}

pub mod actions;
pub mod agents;
pub mod challenges;
pub mod devices;
pub mod errors;
pub mod listener;


pub use actions::ActionsListener;
pub use agents::AgentsListener;
pub use challenges::{ChallengerListener, ChallengesListener};
pub use devices::DevicesListener;
pub use errors::ListenerError;
pub use listener::{ContractListener, Listening, Payload};
