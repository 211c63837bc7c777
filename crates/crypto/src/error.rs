// Path: crates/crypto/src/error.rs
//! Local error types for the `pulsar-crypto` crate.

// Re-export the canonical error type from the types crate.
pub use pulsar_types::error::CryptoError;
