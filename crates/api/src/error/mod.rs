// Path: crates/api/src/error/mod.rs
// Re-export all core error types from the central types crate.
pub use pulsar_types::error::{
    BridgeError, ConfigError, CryptoError, ErrorCode, KeyStoreError, LedgerError, StateError,
    VerifierError, VoteExtError,
};
pub use pulsar_types::Result;
