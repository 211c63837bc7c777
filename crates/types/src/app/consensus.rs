// Path: crates/types/src/app/consensus.rs

//! Validator descriptors consumed by the validator-set merkleizer.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A validator of the provider chain, as reported by the consumer module.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct CrossChainValidator {
    /// The validator's local consensus address.
    pub address: String,
    /// The validator's voting power.
    pub power: i64,
}

/// A pending change to the cross-chain validator set. A power of zero removes the validator.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct ValidatorUpdate {
    /// The validator's local consensus address.
    pub address: String,
    /// The new voting power.
    pub power: i64,
}

/// A validator identified by its foreign-chain address. Recomputed every height.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct ValidatorInfo {
    /// The base58check foreign-chain address of the validator's registered key.
    pub foreign_address: String,
    /// The validator's voting power.
    pub power: i64,
}

/// A validator-set delta keyed by foreign-chain address.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct ForeignValidatorUpdate {
    /// The base58check foreign-chain address.
    pub foreign_address: String,
    /// The new voting power; zero removes the validator.
    pub power: i64,
}
