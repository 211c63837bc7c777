// Path: crates/api/src/state/mod.rs
//! Core traits for state management.
//!
//! - `StateAccess`: basic key-value store operations, the atomic boundary every
//!   durable write of the validator goes through.
//! - `StateOverlay`: a copy-on-write view used to stage a transaction's writes and
//!   commit them in one batch.

use parity_scale_codec::{Decode, Encode};
use pulsar_types::codec::{from_bytes_canonical, to_bytes_canonical};
use pulsar_types::error::StateError;
use std::sync::Arc;

// --- Type Aliases for common state patterns ---
/// An atomically reference-counted, owned key slice.
pub type StateKey = Arc<[u8]>;
/// An atomically reference-counted, owned value slice.
pub type StateVal = Arc<[u8]>;
/// An owned key-value pair from the state, using cheap-to-clone Arcs.
pub type StateKVPair = (StateKey, StateVal);
/// A streaming iterator over key-value pairs from the state. It is Send-safe
/// to be moved across async tasks. `Sync` is omitted as iterators are stateful.
pub type StateScanIter<'a> = Box<dyn Iterator<Item = Result<StateKVPair, StateError>> + Send + 'a>;

mod accessor;
mod overlay;

pub use accessor::*;
pub use overlay::*;

/// Reads and decodes a SCALE-encoded value, returning `None` for a missing key.
pub fn get_decoded<T: Decode>(
    state: &dyn StateAccess,
    key: &[u8],
) -> Result<Option<T>, StateError> {
    state
        .get(key)?
        .map(|bytes| from_bytes_canonical::<T>(&bytes))
        .transpose()
        .map_err(StateError::Decode)
}

/// Encodes a value canonically and writes it under `key`.
pub fn put_encoded<T: Encode>(
    state: &mut dyn StateAccess,
    key: &[u8],
    value: &T,
) -> Result<(), StateError> {
    let bytes = to_bytes_canonical(value).map_err(StateError::InvalidValue)?;
    state.insert(key, &bytes)
}
