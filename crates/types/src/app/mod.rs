// Path: crates/types/src/app/mod.rs
//! Core application-level data structures for the bridge and the vote-extension protocol.

/// Cross-chain bridge actions and their type tags.
pub mod action;
/// Bridge module parameters, commission arithmetic and state snapshots.
pub mod bridge;
/// Validator descriptors used to build the attested validator-set commitment.
pub mod consensus;
/// Typed events emitted by bridge transactions.
pub mod events;
/// Foreign-key registry entries.
pub mod keystore;
/// Pagination primitives for list queries.
pub mod query;
/// Persisted vote-extension records and their height index.
pub mod vote_ext;

pub use action::*;
pub use bridge::*;
pub use consensus::*;
pub use events::*;
pub use keystore::*;
pub use query::*;
pub use vote_ext::*;
