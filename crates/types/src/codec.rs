// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for all consensus-critical state.
//!
//! This module provides simple wrappers around `parity-scale-codec` (SCALE). Every
//! value the bridge and vote-extension stores write to state (approved action logs,
//! key-store entries, persisted vote-extension records) goes through these two
//! functions, so that every validator produces the exact same bytes for the same
//! value and state roots never diverge on encoding.

use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into a deterministic, canonical byte representation using SCALE codec.
///
/// This function should be used for all data that is written to consensus-critical state.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Result<Vec<u8>, String> {
    Ok(v.encode())
}

/// Decodes a value from a canonical byte representation using SCALE codec.
///
/// This function fails fast on any decoding error, including trailing bytes,
/// returning a descriptive string.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Action, ActionType, VoteExtIndex};

    #[test]
    fn test_action_list_roundtrip() {
        let actions = vec![
            Action {
                public_key: "B62qpk".to_string(),
                amount: 1_000_000,
                action_type: ActionType::Deposit,
                block_height: 7,
                local_address: "consumer1abc".to_string(),
                local_signature: vec![1, 2, 3],
            },
            Action {
                public_key: "B62qother".to_string(),
                amount: u128::MAX,
                action_type: ActionType::Settlement,
                block_height: 8,
                local_address: String::new(),
                local_signature: Vec::new(),
            },
        ];

        let encoded = to_bytes_canonical(&actions).unwrap();
        let decoded = from_bytes_canonical::<Vec<Action>>(&encoded).unwrap();
        assert_eq!(actions, decoded);
    }

    #[test]
    fn test_canonical_decode_rejects_trailing_bytes() {
        let index = VoteExtIndex {
            height: 3,
            indexes: vec!["3/B62qa".to_string()],
        };
        let mut encoded = to_bytes_canonical(&index).unwrap();
        encoded.push(0xff);

        let result = from_bytes_canonical::<VoteExtIndex>(&encoded);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("canonical decode failed"));
    }
}
