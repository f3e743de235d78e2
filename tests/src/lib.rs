//! # Access-Chain Test Suite
//!
//! Cross-crate tests run against an in-process chain that executes the
//! access contracts, so facades, listeners and the oracle are exercised
//! through the same chain client seam a live node sits behind.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── chain/            # Simulated node (mod.rs: the ChainClient)
//! │   ├── abi.rs        # Contract interfaces and bytecode markers
//! │   └── contracts.rs  # Contract state machines
//! │
//! ├── fixtures.rs       # Wired deployment, canonical values, waiting
//! │
//! └── integration/      # End-to-end flows
//!     ├── challenge_lifecycle.rs
//!     ├── lookups.rs
//!     └── oracle.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ac-tests
//!
//! # By category
//! cargo test -p ac-tests integration::
//! cargo test -p ac-tests chain::
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod fixtures;
