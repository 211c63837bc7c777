// Path: crates/crypto/src/lib.rs
//! # Pulsar Crypto Crate Lints
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
//! # Pulsar Cryptography
//!
//! Arithmetic over the Pallas fields and curve, the Kimchi-shaped Poseidon
//! sponge, Schnorr signatures compatible with the attested chain's key format,
//! and the rolling action accumulator built on top of them.

pub mod accumulator;
pub mod curve;
pub mod error;
pub mod field;
pub mod keys;
pub mod poseidon;
pub mod schnorr;

pub use accumulator::ActionAccumulator;
pub use field::{Fp, Fq};
pub use keys::{Keypair, PublicKey, SecretKey};
pub use poseidon::{hash, hash_with_prefix, Poseidon};
pub use schnorr::{sign, verify, Signature};
