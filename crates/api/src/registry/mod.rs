// Path: crates/api/src/registry/mod.rs

//! Defines the `KeyRegistry` trait for decoupled foreign-key lookups.

use crate::state::StateAccess;
use pulsar_types::app::KeyStoreEntry;
use pulsar_types::error::KeyStoreError;

/// A read-only view of the local-identity to foreign-key bindings.
///
/// Implemented by the key-store service and consumed by the vote-extension
/// handler (validator lookups) and the bridge keeper (deposit resolution).
pub trait KeyRegistry: Send + Sync {
    /// Looks up the entry registered by a local identity.
    fn get(
        &self,
        state: &dyn StateAccess,
        identity: &str,
    ) -> Result<Option<KeyStoreEntry>, KeyStoreError>;

    /// Looks up the entry bound to a base58check foreign address.
    fn get_by_foreign_key(
        &self,
        state: &dyn StateAccess,
        foreign_public_key: &str,
    ) -> Result<Option<KeyStoreEntry>, KeyStoreError>;

    /// Whether a foreign address is bound to any local identity.
    fn is_foreign_key_registered(
        &self,
        state: &dyn StateAccess,
        foreign_public_key: &str,
    ) -> Result<bool, KeyStoreError> {
        Ok(self.get_by_foreign_key(state, foreign_public_key)?.is_some())
    }
}

impl<T: KeyRegistry + ?Sized> KeyRegistry for std::sync::Arc<T> {
    fn get(
        &self,
        state: &dyn StateAccess,
        identity: &str,
    ) -> Result<Option<KeyStoreEntry>, KeyStoreError> {
        (**self).get(state, identity)
    }

    fn get_by_foreign_key(
        &self,
        state: &dyn StateAccess,
        foreign_public_key: &str,
    ) -> Result<Option<KeyStoreEntry>, KeyStoreError> {
        (**self).get_by_foreign_key(state, foreign_public_key)
    }
}
