// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Pulsar Types
//!
//! This crate is the foundational library for the Pulsar validator, containing
//! the core data structures, error types, state keys and configuration objects
//! shared by the vote-extension handler and the bridge services.
//!
//! ## Architectural Role
//!
//! As the base crate, `pulsar-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. Cryptographic types
//! (field elements, curve points) live in `pulsar-crypto`; everything in this
//! crate is plain data that can be encoded to state or JSON.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::StateError> = std::result::Result<T, E>;

/// Application-level data structures: bridge actions, key-store entries,
/// validator descriptors, persisted vote-extension records and events.
pub mod app;
/// The canonical, deterministic binary codec for consensus-critical state.
pub mod codec;
/// Shared configuration structures loaded from TOML.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Constants and builders for well-known state keys.
pub mod keys;
/// A prelude containing useful extension traits like `OptionExt`.
pub mod prelude;
/// Serde adapters for amounts and byte strings on the JSON wire.
pub mod serde_helpers;
