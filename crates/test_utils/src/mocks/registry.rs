// Path: crates/test_utils/src/mocks/registry.rs
use parking_lot::RwLock;
use pulsar_api::registry::KeyRegistry;
use pulsar_api::state::StateAccess;
use pulsar_types::app::KeyStoreEntry;
use pulsar_types::error::{KeyStoreError, StateError};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// A key registry held in memory instead of state.
#[derive(Debug, Default)]
pub struct MockRegistry {
    entries: RwLock<BTreeMap<String, KeyStoreEntry>>,
    unavailable: AtomicBool,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `identity` to `foreign_address`, replacing any previous entry.
    pub fn register(&self, identity: &str, foreign_address: &str) {
        self.entries.write().insert(
            identity.to_string(),
            KeyStoreEntry {
                creator: identity.to_string(),
                local_public_key: hex::encode(identity),
                foreign_public_key: foreign_address.to_string(),
            },
        );
    }

    /// Makes every lookup fail with a backend error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), KeyStoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(KeyStoreError::State(StateError::Backend(
                "registry unavailable".into(),
            )));
        }
        Ok(())
    }
}

impl KeyRegistry for MockRegistry {
    fn get(
        &self,
        _state: &dyn StateAccess,
        identity: &str,
    ) -> Result<Option<KeyStoreEntry>, KeyStoreError> {
        self.check_available()?;
        Ok(self.entries.read().get(identity).cloned())
    }

    fn get_by_foreign_key(
        &self,
        _state: &dyn StateAccess,
        foreign_public_key: &str,
    ) -> Result<Option<KeyStoreEntry>, KeyStoreError> {
        self.check_available()?;
        Ok(self
            .entries
            .read()
            .values()
            .find(|e| e.foreign_public_key == foreign_public_key)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_state::memory::MemoryState;

    #[test]
    fn lookups_by_both_keys() {
        let registry = MockRegistry::new();
        let state = MemoryState::new();
        registry.register("val1", "B62qforeign");
        assert_eq!(
            registry.get(&state, "val1").unwrap().unwrap().foreign_public_key,
            "B62qforeign"
        );
        assert!(registry
            .is_foreign_key_registered(&state, "B62qforeign")
            .unwrap());
        registry.set_unavailable(true);
        assert!(registry.get(&state, "val1").is_err());
    }
}
