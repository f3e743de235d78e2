//! # Shared Types Crate
//!
//! Validated value types and domain aggregates for the access-chain client.
//!
//! ## Design Principles
//!
//! - **Construction is admission**: every type is built through a validating
//!   constructor returning [`ValidationError`]; an instance can never be
//!   observed in an invalid state.
//! - **Sentinels are explicit**: identifier `0` and the all-zero address are
//!   representable (the chain uses them) but always detectable via
//!   `is_sentinel()` / `is_unknown()`.
//! - **States are variants**: pending, authorized and denied actions and
//!   challenges are one type with a [`Resolution`] discriminant.

pub mod entities;
pub mod errors;
pub mod serialization;
pub mod values;

pub use entities::*;
pub use errors::*;
pub use serialization::inflate_challenge_ids;
pub use values::*;

pub use alloy::primitives::{Address, U256};
