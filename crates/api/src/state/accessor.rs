// Path: crates/api/src/state/accessor.rs
//! Defines the `StateAccess` trait for key-value storage operations.

use crate::state::StateScanIter;
use pulsar_types::error::StateError;

/// Key-value access to the application state.
///
/// The key registry, the vote-extension store and the bridge keeper all take a
/// `&dyn StateAccess` or `&mut dyn StateAccess` from their caller; the caller owns
/// the block's atomic boundary.
pub trait StateAccess: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), StateError>;

    /// Applies deletes, then inserts, as one unit. `StateOverlay` commits
    /// through this.
    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError>;

    /// All pairs under `prefix`, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError>;

    fn batch_set(&mut self, updates: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StateError> {
        updates
            .iter()
            .try_for_each(|(key, value)| self.insert(key, value))
    }
}
