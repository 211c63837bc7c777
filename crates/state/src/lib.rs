// Path: crates/state/src/lib.rs
//! # Pulsar State Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # Pulsar State
//!
//! An ordered in-memory `StateAccess` backend and the hash commitment the
//! node reports as its application hash.

pub mod commitment;
pub mod memory;

/// A prelude for easily importing the most common types.
pub mod prelude {
    pub use crate::commitment::{StateCommitment, COMMITMENT_LEN};
    pub use crate::memory::MemoryState;
}
