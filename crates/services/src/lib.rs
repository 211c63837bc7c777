// Path: crates/services/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # Pulsar Services
//!
//! The state-backed modules of the validator: the foreign key registry and
//! its vote-extension record store, a state-backed bank ledger, the bridge keeper that resolves prover
//! batches, and the HTTP client for the external action verifier.

pub mod bank;
pub mod bridge;
pub mod keystore;
mod pagination;
pub mod verifier;

pub use bank::StateBank;
pub use bridge::{BridgeKeeper, BridgeQuery};
pub use keystore::{KeyStoreService, VoteExtStore};
pub use verifier::HttpActionVerifier;
