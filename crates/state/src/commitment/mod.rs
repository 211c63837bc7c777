// Path: crates/state/src/commitment/mod.rs
//! Hash commitment over an ordered key-value set.

use blake2::{Blake2s256, Digest};
use std::fmt;

/// Length of a commitment in bytes.
pub const COMMITMENT_LEN: usize = 32;

/// A Blake2s commitment to the full contents of a state.
///
/// Every pair is absorbed as `len(key) || key || len(value) || value` with
/// 8-byte big-endian lengths, in ascending key order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StateCommitment([u8; COMMITMENT_LEN]);

impl StateCommitment {
    /// Commits to `pairs`, which must already be in ascending key order.
    pub fn from_ordered_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a [u8], &'a [u8])>,
    {
        let mut hasher = Blake2s256::new();
        for (key, value) in pairs {
            hasher.update((key.len() as u64).to_be_bytes());
            hasher.update(key);
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value);
        }
        Self(hasher.finalize().into())
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; COMMITMENT_LEN] {
        &self.0
    }

    /// The raw bytes as a vector, as passed to consensus callbacks.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl AsRef<[u8]> for StateCommitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for StateCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateCommitment({})", hex::encode_upper(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commitment_binds_keys_and_values() {
        let a = StateCommitment::from_ordered_pairs([(&b"k"[..], &b"v"[..])]);
        let b = StateCommitment::from_ordered_pairs([(&b"k"[..], &b"w"[..])]);
        // Length prefixes keep "kv" + "" apart from "k" + "v".
        let c = StateCommitment::from_ordered_pairs([(&b"kv"[..], &b""[..])]);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, StateCommitment::from_ordered_pairs([(&b"k"[..], &b"v"[..])]));
    }
}
