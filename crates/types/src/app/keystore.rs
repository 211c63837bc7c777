// Path: crates/types/src/app/keystore.rs

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Binds a local account to its local consensus key and a foreign-chain key.
///
/// Stored under the creator; a reverse index maps the foreign key back to the
/// creator so each foreign key can be bound at most once.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct KeyStoreEntry {
    /// The local account that registered the entry.
    pub creator: String,
    /// The hex-encoded local consensus public key.
    pub local_public_key: String,
    /// The base58check foreign-chain address.
    pub foreign_public_key: String,
}

/// A registration request.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct RegisterKeysMsg {
    /// The registering local account.
    pub creator: String,
    /// The hex-encoded local consensus public key.
    pub local_public_key: String,
    /// The base58check foreign-chain address.
    pub foreign_public_key: String,
}

/// The affine coordinates behind a foreign address.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyCoordinates {
    /// The x-coordinate as a decimal string.
    pub x: String,
    /// Whether the y-coordinate is odd.
    pub is_odd: bool,
}
