// Path: crates/consensus/src/lib.rs
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
//! Per-height attestation of the attested chain's validator set and state root.
//!
//! [`merkleizer`] commits to a validator set with Poseidon; [`vote_ext`] signs
//! that commitment into a vote extension, checks peers' extensions, carries
//! them in the next proposal and persists them once the block finalizes.

pub mod merkleizer;
pub mod vote_ext;

pub use merkleizer::Merkleizer;
pub use vote_ext::{VoteCache, VoteExtHandler};
