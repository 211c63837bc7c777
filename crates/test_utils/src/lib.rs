// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Pulsar Test Utilities
//!
//! Mock collaborators, fixtures and deterministic key material shared by the
//! integration tests of the consensus and services crates.

pub mod assertions;
pub mod fixtures;
pub mod mocks;
pub mod randomness;

pub use mocks::{MockLedger, MockRegistry, MockValidatorSource, MockVerifier};
pub use randomness::{keypair, TestRng};
