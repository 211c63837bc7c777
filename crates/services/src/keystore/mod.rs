// Path: crates/services/src/keystore/mod.rs
//! The foreign key registry.
//!
//! Each local identity binds exactly one foreign-chain key, and each foreign
//! key is bound at most once. Entries live under `minakeys::keystore::` with a
//! reverse index under `minakeys::foreign::`.

mod vote_ext;

pub use vote_ext::VoteExtStore;

use crate::pagination::paginate_prefix;
use pulsar_api::registry::KeyRegistry;
use pulsar_api::state::{commit_change_set, get_decoded, put_encoded, StateAccess, StateOverlay};
use pulsar_crypto::PublicKey;
use pulsar_types::app::{ForeignKeyCoordinates, KeyStoreEntry, Page, PageRequest, RegisterKeysMsg};
use pulsar_types::codec::from_bytes_canonical;
use pulsar_types::error::{KeyStoreError, StateError};
use pulsar_types::keys::{foreign_index_key, keystore_key, KEYSTORE_PREFIX};
use tracing::info;

/// The state-backed key registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyStoreService;

impl KeyStoreService {
    pub fn new() -> Self {
        Self
    }

    /// Binds `msg.creator` to `msg.foreign_public_key`.
    pub fn register(
        &self,
        state: &mut dyn StateAccess,
        msg: &RegisterKeysMsg,
    ) -> Result<KeyStoreEntry, KeyStoreError> {
        let creator = msg.creator.trim();
        if creator.is_empty() {
            return Err(KeyStoreError::InvalidRequest("creator cannot be empty".into()));
        }
        if msg.local_public_key.trim().is_empty() {
            return Err(KeyStoreError::InvalidRequest(
                "local public key cannot be empty".into(),
            ));
        }
        hex::decode(msg.local_public_key.trim()).map_err(|e| {
            KeyStoreError::InvalidRequest(format!("local public key is not hex: {}", e))
        })?;
        let foreign = PublicKey::from_address(&msg.foreign_public_key)?.to_address();

        if state.get(&keystore_key(creator))?.is_some() {
            return Err(KeyStoreError::AlreadyRegistered(creator.to_string()));
        }
        if state.get(&foreign_index_key(&foreign))?.is_some() {
            return Err(KeyStoreError::ForeignKeyInUse(foreign));
        }

        let entry = KeyStoreEntry {
            creator: creator.to_string(),
            local_public_key: msg.local_public_key.trim().to_lowercase(),
            foreign_public_key: foreign,
        };
        let changes = {
            let mut overlay = StateOverlay::new(&*state);
            put_encoded(&mut overlay, &keystore_key(&entry.creator), &entry)?;
            put_encoded(
                &mut overlay,
                &foreign_index_key(&entry.foreign_public_key),
                &entry.creator,
            )?;
            overlay.into_ordered_batch()
        };
        commit_change_set(state, changes)?;

        info!(
            target: "keystore",
            creator = %entry.creator,
            foreign_public_key = %entry.foreign_public_key,
            "registered key store entry"
        );
        Ok(entry)
    }

    /// Entries are immutable once written.
    pub fn update(
        &self,
        _state: &mut dyn StateAccess,
        _msg: &RegisterKeysMsg,
    ) -> Result<KeyStoreEntry, KeyStoreError> {
        Err(KeyStoreError::UpdateNotAllowed)
    }

    /// The entry of `identity`.
    pub fn key_store(
        &self,
        state: &dyn StateAccess,
        identity: &str,
    ) -> Result<KeyStoreEntry, KeyStoreError> {
        self.get(state, identity)?
            .ok_or_else(|| KeyStoreError::NotFound(identity.to_string()))
    }

    /// Every entry, ordered by creator.
    pub fn key_stores(
        &self,
        state: &dyn StateAccess,
        page: &PageRequest,
    ) -> Result<Page<KeyStoreEntry>, KeyStoreError> {
        Ok(paginate_prefix(state, KEYSTORE_PREFIX, page, |_, value| {
            from_bytes_canonical(value).map_err(StateError::Decode)
        })?)
    }

    /// The x-coordinate and y-parity encoded in a foreign address.
    pub fn foreign_pubkey_coordinates(
        &self,
        address: &str,
    ) -> Result<ForeignKeyCoordinates, KeyStoreError> {
        let key = PublicKey::from_address(address)?;
        Ok(ForeignKeyCoordinates {
            x: key.x.to_string(),
            is_odd: key.is_odd,
        })
    }
}

impl KeyRegistry for KeyStoreService {
    fn get(
        &self,
        state: &dyn StateAccess,
        identity: &str,
    ) -> Result<Option<KeyStoreEntry>, KeyStoreError> {
        Ok(get_decoded(state, &keystore_key(identity))?)
    }

    fn get_by_foreign_key(
        &self,
        state: &dyn StateAccess,
        foreign_public_key: &str,
    ) -> Result<Option<KeyStoreEntry>, KeyStoreError> {
        let Some(creator) = get_decoded::<String>(state, &foreign_index_key(foreign_public_key))?
        else {
            return Ok(None);
        };
        self.get(state, &creator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_state::memory::MemoryState;
    use pulsar_test_utils::{assert_err, keypair};

    fn msg(creator: &str, seed: u64) -> RegisterKeysMsg {
        RegisterKeysMsg {
            creator: creator.into(),
            local_public_key: "02ABCD".into(),
            foreign_public_key: keypair(seed).unwrap().address(),
        }
    }

    #[test]
    fn register_then_lookup_both_ways() {
        let service = KeyStoreService::new();
        let mut state = MemoryState::new();
        let entry = service.register(&mut state, &msg("alice", 1)).unwrap();
        assert_eq!(entry.local_public_key, "02abcd");

        assert_eq!(service.key_store(&state, "alice").unwrap(), entry);
        assert_eq!(
            service
                .get_by_foreign_key(&state, &entry.foreign_public_key)
                .unwrap(),
            Some(entry.clone())
        );
        assert!(service
            .is_foreign_key_registered(&state, &entry.foreign_public_key)
            .unwrap());
        assert!(!service
            .is_foreign_key_registered(&state, &keypair(2).unwrap().address())
            .unwrap());
    }

    #[test]
    fn duplicates_are_rejected() {
        let service = KeyStoreService::new();
        let mut state = MemoryState::new();
        service.register(&mut state, &msg("alice", 1)).unwrap();

        let err = assert_err!(service.register(&mut state, &msg("alice", 2)));
        assert_eq!(err, KeyStoreError::AlreadyRegistered("alice".into()));
        let err = assert_err!(service.register(&mut state, &msg("bob", 1)));
        assert!(matches!(err, KeyStoreError::ForeignKeyInUse(_)));
        assert!(service.key_store(&state, "bob").is_err());
    }

    #[test]
    fn bad_requests_are_rejected() {
        let service = KeyStoreService::new();
        let mut state = MemoryState::new();
        let mut bad = msg("", 1);
        assert!(matches!(
            service.register(&mut state, &bad),
            Err(KeyStoreError::InvalidRequest(_))
        ));
        bad = msg("carol", 1);
        bad.local_public_key = "zz".into();
        assert!(matches!(
            service.register(&mut state, &bad),
            Err(KeyStoreError::InvalidRequest(_))
        ));
        bad = msg("carol", 1);
        bad.foreign_public_key = "B62qnope".into();
        assert!(matches!(
            service.register(&mut state, &bad),
            Err(KeyStoreError::Crypto(_))
        ));
        assert!(state.is_empty());
        assert_eq!(
            service.update(&mut state, &msg("carol", 1)),
            Err(KeyStoreError::UpdateNotAllowed)
        );
    }

    #[test]
    fn entries_page_by_creator() {
        let service = KeyStoreService::new();
        let mut state = MemoryState::new();
        for (i, name) in ["dave", "alice", "carol", "bob"].iter().enumerate() {
            service
                .register(&mut state, &msg(name, i as u64 + 10))
                .unwrap();
        }
        let page = service
            .key_stores(
                &state,
                &PageRequest {
                    offset: 1,
                    limit: 2,
                    count_total: true,
                },
            )
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|e| e.creator.as_str()).collect();
        assert_eq!(names, vec!["bob", "carol"]);
        assert_eq!(page.pagination.total, Some(4));
        assert_eq!(page.pagination.next_offset, Some(3));
    }

    #[test]
    fn coordinates_come_from_the_address() {
        let service = KeyStoreService::new();
        let kp = keypair(5).unwrap();
        let coords = service.foreign_pubkey_coordinates(&kp.address()).unwrap();
        assert_eq!(coords.x, kp.public().x.to_string());
        assert_eq!(coords.is_odd, kp.public().is_odd);
        assert!(service.foreign_pubkey_coordinates("junk").is_err());
    }
}
