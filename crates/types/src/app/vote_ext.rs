// Path: crates/types/src/app/vote_ext.rs

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A finalized vote extension persisted by the vote-extension store.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct VoteExtRecord {
    /// `"<height>/<validator_addr>"`.
    pub index: String,
    /// The height whose transition the vote attests.
    pub height: u64,
    /// The validator's foreign-chain address.
    pub validator_addr: String,
    /// The hex-encoded foreign-chain signature.
    pub signature: String,
}

impl VoteExtRecord {
    /// Builds the record index for a height and validator.
    pub fn index_for(height: u64, validator_addr: &str) -> String {
        format!("{}/{}", height, validator_addr)
    }
}

/// All record indexes persisted for one height, in insertion order.
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, PartialEq, Eq, Default)]
pub struct VoteExtIndex {
    /// The height.
    pub height: u64,
    /// The record indexes; never contains duplicates.
    pub indexes: Vec<String>,
}

impl VoteExtIndex {
    /// Appends `index` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, index: String) -> bool {
        if self.indexes.iter().any(|i| *i == index) {
            return false;
        }
        self.indexes.push(index);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_insert_is_idempotent() {
        let mut idx = VoteExtIndex {
            height: 4,
            indexes: vec![],
        };
        let key = VoteExtRecord::index_for(4, "abcd");
        assert_eq!(key, "4/abcd");
        assert!(idx.insert(key.clone()));
        assert!(!idx.insert(key));
        assert_eq!(idx.indexes.len(), 1);
    }
}
