// Path: crates/api/src/lib.rs

//! # Pulsar API Crate Lints
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
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # Pulsar API
//!
//! Core traits and interfaces for the Pulsar validator. This crate defines the
//! stable contract between the vote-extension handler, the bridge services and
//! the collaborators they depend on (ledger, key registry, action verifier and
//! the consumer module's validator source).

/// The consensus-engine callback interface and the validator-set source.
pub mod consensus;
/// Re-exports all core error types from the central `pulsar-types` crate.
pub mod error;
/// The bank ledger collaborator (mint, burn, transfer).
pub mod ledger;
/// The read-only key registry lookup.
pub mod registry;
/// Core traits for state access and the copy-on-write overlay.
pub mod state;
/// The external action verifier interface.
pub mod verifier;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::consensus::{
        CrossChainValidatorSource, ProposalStatus, RejectReason, VerifyStatus,
        VoteExtRecordSink, VoteExtensionApp,
    };
    pub use crate::error::{
        BridgeError, CryptoError, ErrorCode, KeyStoreError, LedgerError, StateError,
        VerifierError, VoteExtError,
    };
    pub use crate::ledger::Ledger;
    pub use crate::registry::KeyRegistry;
    pub use crate::state::{StateAccess, StateOverlay};
    pub use crate::verifier::ActionVerifier;
}
