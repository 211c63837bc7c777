// Path: crates/cli/src/lib.rs
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

//! # Pulsar CLI Library
//!
//! Assembles a standalone validator core from a `validator.toml` and a
//! genesis file, for operators and for tests that want the same wiring the
//! `pulsar` binary uses.
//!
//! ## Architectural Boundary
//!
//! This crate only composes the public APIs of the other `pulsar-*` crates.
//! It holds no protocol logic of its own: the handler, keeper and stores it
//! builds are the library types, and a consensus engine drives them through
//! the `VoteExtensionApp` callbacks.

pub mod genesis;
pub mod node;

pub use genesis::{Genesis, StaticValidatorSource};
pub use node::ValidatorNode;
