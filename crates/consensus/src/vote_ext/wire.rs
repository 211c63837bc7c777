// Path: crates/consensus/src/vote_ext/wire.rs
//! JSON shapes of the signed extension and the proposal's `VOTEEXT:` transaction.

use pulsar_api::consensus::RejectReason;
use pulsar_crypto::{Fp, Poseidon};
use pulsar_types::error::VoteExtError;
use pulsar_types::serde_helpers::{base64_bytes, base64_map};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix of the proposal transaction carrying the previous height's votes.
pub const VOTE_EXT_MARKER: &[u8] = b"VOTEEXT:";

/// The state root assumed for height 1 (the SHA-256 of empty input).
pub const GENESIS_STATE_ROOT_HEX: &str =
    "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855";

/// What a validator attests for the transition `H-1 -> H`.
///
/// Validator-set roots serialize as decimal strings, not JSON numbers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VoteExtensionBody {
    pub initial_validator_set_root: Fp,
    #[serde(with = "base64_bytes")]
    pub initial_state_root: Vec<u8>,
    pub initial_block_height: i64,
    pub new_validator_set_root: Fp,
    #[serde(with = "base64_bytes")]
    pub new_state_root: Vec<u8>,
    pub new_block_height: i64,
}

impl VoteExtensionBody {
    /// The signed message: a single element, the Poseidon hash of the six
    /// fields. State roots are read as big-endian integers reduced into `Fp`.
    pub fn signing_message(&self, poseidon: &Poseidon<'_>) -> Vec<Fp> {
        let digest = poseidon.hash(&[
            self.initial_validator_set_root.clone(),
            Fp::from_bytes_be_reduce(&self.initial_state_root),
            Fp::from_i64(self.initial_block_height),
            self.new_validator_set_root.clone(),
            Fp::from_bytes_be_reduce(&self.new_state_root),
            Fp::from_i64(self.new_block_height),
        ]);
        vec![digest]
    }

    /// The first field in which `other` differs from `self`, if any.
    pub fn first_mismatch(&self, other: &Self) -> Option<&'static str> {
        if self.initial_validator_set_root != other.initial_validator_set_root {
            Some("initial validator set root")
        } else if self.initial_block_height != other.initial_block_height {
            Some("initial block height")
        } else if self.new_validator_set_root != other.new_validator_set_root {
            Some("new validator set root")
        } else if self.new_block_height != other.new_block_height {
            Some("new block height")
        } else if self.initial_state_root != other.initial_state_root {
            Some("initial state root")
        } else if self.new_state_root != other.new_state_root {
            Some("new state root")
        } else {
            None
        }
    }
}

/// A body with its signer's foreign address and Schnorr signature.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignedVoteExtension {
    #[serde(rename = "mina_address")]
    pub signer_address: String,
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
    #[serde(rename = "vote_ext_body")]
    pub body: VoteExtensionBody,
}

impl SignedVoteExtension {
    pub fn to_bytes(&self) -> Result<Vec<u8>, VoteExtError> {
        serde_json::to_vec(self).map_err(|e| VoteExtError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// The votes of one height, as carried in a proposal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct VoteExtPayload {
    pub height: u64,
    /// Signer foreign address to raw extension bytes.
    #[serde(with = "base64_map")]
    pub votes: BTreeMap<String, Vec<u8>>,
}

impl VoteExtPayload {
    /// `VOTEEXT:` followed by the JSON payload.
    pub fn encode_tx(&self) -> Result<Vec<u8>, VoteExtError> {
        let json =
            serde_json::to_vec(self).map_err(|e| VoteExtError::Serialization(e.to_string()))?;
        Ok([VOTE_EXT_MARKER, json.as_slice()].concat())
    }

    /// Decodes a transaction produced by [`VoteExtPayload::encode_tx`].
    pub fn decode_tx(tx: &[u8]) -> Result<Self, RejectReason> {
        let json = tx
            .strip_prefix(VOTE_EXT_MARKER)
            .filter(|rest| !rest.is_empty())
            .ok_or(RejectReason::MissingMarker)?;
        serde_json::from_slice(json).map_err(|e| RejectReason::MalformedPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> VoteExtensionBody {
        VoteExtensionBody {
            initial_validator_set_root: Fp::from_u64(11),
            initial_state_root: vec![0xaa; 32],
            initial_block_height: 4,
            new_validator_set_root: Fp::from_u64(12),
            new_state_root: vec![0xbb; 32],
            new_block_height: 5,
        }
    }

    #[test]
    fn signed_extension_uses_wire_names() {
        let ext = SignedVoteExtension {
            signer_address: "B62qsigner".into(),
            signature: vec![1, 2, 3],
            body: body(),
        };
        let json: serde_json::Value = serde_json::from_slice(&ext.to_bytes().unwrap()).unwrap();
        assert_eq!(json["mina_address"], "B62qsigner");
        assert_eq!(json["signature"], "AQID");
        assert_eq!(json["vote_ext_body"]["initial_validator_set_root"], "11");
        assert_eq!(json["vote_ext_body"]["new_block_height"], 5);
        let back = SignedVoteExtension::from_bytes(&ext.to_bytes().unwrap()).unwrap();
        assert_eq!(back, ext);
    }

    #[test]
    fn payload_tx_round_trips() {
        let mut votes = BTreeMap::new();
        votes.insert("B62qa".to_string(), b"{\"x\":1}".to_vec());
        let payload = VoteExtPayload { height: 9, votes };
        let tx = payload.encode_tx().unwrap();
        assert!(tx.starts_with(VOTE_EXT_MARKER));
        assert_eq!(VoteExtPayload::decode_tx(&tx).unwrap(), payload);
    }

    #[test]
    fn payload_decode_distinguishes_missing_and_malformed() {
        assert_eq!(
            VoteExtPayload::decode_tx(b"regular tx"),
            Err(RejectReason::MissingMarker)
        );
        assert_eq!(
            VoteExtPayload::decode_tx(VOTE_EXT_MARKER),
            Err(RejectReason::MissingMarker)
        );
        assert!(matches!(
            VoteExtPayload::decode_tx(b"VOTEEXT:{not json"),
            Err(RejectReason::MalformedPayload(_))
        ));
    }

    #[test]
    fn mismatch_reports_first_differing_field() {
        let a = body();
        let mut b = body();
        assert_eq!(a.first_mismatch(&b), None);
        b.new_block_height = 6;
        assert_eq!(a.first_mismatch(&b), Some("new block height"));
        b.initial_validator_set_root = Fp::from_u64(99);
        assert_eq!(a.first_mismatch(&b), Some("initial validator set root"));
        assert_ne!(
            a.signing_message(&Poseidon::kimchi()),
            b.signing_message(&Poseidon::kimchi())
        );
    }
}
