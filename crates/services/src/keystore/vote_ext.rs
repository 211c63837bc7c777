// Path: crates/services/src/keystore/vote_ext.rs
//! Finalized vote-extension records and their per-height index.

use crate::pagination::{paginate_prefix, paginate_slice};
use pulsar_api::consensus::VoteExtRecordSink;
use pulsar_api::state::{get_decoded, put_encoded, StateAccess};
use pulsar_types::app::{Page, PageRequest, VoteExtIndex, VoteExtRecord};
use pulsar_types::codec::from_bytes_canonical;
use pulsar_types::error::StateError;
use pulsar_types::keys::{vote_ext_index_key, vote_ext_key, VOTE_EXT_PREFIX};
use tracing::debug;

/// Reads and writes vote-extension records under `minakeys::vote_ext::`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoteExtStore;

impl VoteExtStore {
    pub fn new() -> Self {
        Self
    }

    pub fn vote_ext(
        &self,
        state: &dyn StateAccess,
        index: &str,
    ) -> Result<Option<VoteExtRecord>, StateError> {
        get_decoded(state, &vote_ext_key(index))
    }

    pub fn vote_ext_index(
        &self,
        state: &dyn StateAccess,
        height: u64,
    ) -> Result<Option<VoteExtIndex>, StateError> {
        get_decoded(state, &vote_ext_index_key(height))
    }

    /// Records finalized at `height`, in index insertion order. Dangling
    /// index entries are skipped.
    pub fn vote_exts_by_height(
        &self,
        state: &dyn StateAccess,
        height: u64,
        page: &PageRequest,
    ) -> Result<Page<VoteExtRecord>, StateError> {
        let indexes = self
            .vote_ext_index(state, height)?
            .map(|idx| idx.indexes)
            .unwrap_or_default();
        let page = paginate_slice(&indexes, page);
        let mut items = Vec::with_capacity(page.items.len());
        for index in &page.items {
            match self.vote_ext(state, index)? {
                Some(record) => items.push(record),
                None => debug!(target: "vote_ext", %index, "index entry without a record"),
            }
        }
        Ok(Page {
            items,
            pagination: page.pagination,
        })
    }

    /// Every record, ordered by index string.
    pub fn all_vote_exts(
        &self,
        state: &dyn StateAccess,
        page: &PageRequest,
    ) -> Result<Page<VoteExtRecord>, StateError> {
        paginate_prefix(state, VOTE_EXT_PREFIX, page, |_, value| {
            from_bytes_canonical(value).map_err(StateError::Decode)
        })
    }

    pub fn remove_vote_ext(&self, state: &mut dyn StateAccess, index: &str) -> Result<(), StateError> {
        state.delete(&vote_ext_key(index))
    }

    pub fn remove_vote_ext_index(
        &self,
        state: &mut dyn StateAccess,
        height: u64,
    ) -> Result<(), StateError> {
        state.delete(&vote_ext_index_key(height))
    }
}

impl VoteExtRecordSink for VoteExtStore {
    fn set_vote_ext(
        &self,
        state: &mut dyn StateAccess,
        record: &VoteExtRecord,
    ) -> Result<(), StateError> {
        put_encoded(state, &vote_ext_key(&record.index), record)
    }

    fn set_vote_ext_index(
        &self,
        state: &mut dyn StateAccess,
        height: u64,
        index: &str,
    ) -> Result<(), StateError> {
        let mut entry = self
            .vote_ext_index(&*state, height)?
            .unwrap_or(VoteExtIndex {
                height,
                indexes: Vec::new(),
            });
        if !entry.insert(index.to_string()) {
            return Ok(());
        }
        put_encoded(state, &vote_ext_index_key(height), &entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_state::memory::MemoryState;

    fn record(height: u64, validator: &str) -> VoteExtRecord {
        VoteExtRecord {
            index: VoteExtRecord::index_for(height, validator),
            height,
            validator_addr: validator.into(),
            signature: format!("sig-{}-{}", height, validator),
        }
    }

    fn store_all(store: &VoteExtStore, state: &mut MemoryState, records: &[VoteExtRecord]) {
        for r in records {
            store.set_vote_ext(state, r).unwrap();
            store.set_vote_ext_index(state, r.height, &r.index).unwrap();
        }
    }

    #[test]
    fn records_round_trip_and_overwrite() {
        let store = VoteExtStore::new();
        let mut state = MemoryState::new();
        let mut r = record(5, "aa");
        store.set_vote_ext(&mut state, &r).unwrap();
        assert_eq!(store.vote_ext(&state, "5/aa").unwrap(), Some(r.clone()));

        r.signature = "replaced".into();
        store.set_vote_ext(&mut state, &r).unwrap();
        assert_eq!(store.vote_ext(&state, "5/aa").unwrap().unwrap().signature, "replaced");

        store.remove_vote_ext(&mut state, "5/aa").unwrap();
        assert_eq!(store.vote_ext(&state, "5/aa").unwrap(), None);
    }

    #[test]
    fn index_append_is_idempotent() {
        let store = VoteExtStore::new();
        let mut state = MemoryState::new();
        store.set_vote_ext_index(&mut state, 7, "7/aa").unwrap();
        store.set_vote_ext_index(&mut state, 7, "7/bb").unwrap();
        store.set_vote_ext_index(&mut state, 7, "7/aa").unwrap();
        let idx = store.vote_ext_index(&state, 7).unwrap().unwrap();
        assert_eq!(idx.height, 7);
        assert_eq!(idx.indexes, vec!["7/aa".to_string(), "7/bb".to_string()]);

        store.remove_vote_ext_index(&mut state, 7).unwrap();
        assert_eq!(store.vote_ext_index(&state, 7).unwrap(), None);
    }

    #[test]
    fn height_query_follows_the_index() {
        let store = VoteExtStore::new();
        let mut state = MemoryState::new();
        store_all(
            &store,
            &mut state,
            &[record(3, "cc"), record(3, "aa"), record(4, "bb")],
        );
        // Dangling entry.
        store.set_vote_ext_index(&mut state, 3, "3/zz").unwrap();

        let page = store
            .vote_exts_by_height(&state, 3, &PageRequest::default())
            .unwrap();
        let validators: Vec<_> = page.items.iter().map(|r| r.validator_addr.as_str()).collect();
        assert_eq!(validators, vec!["cc", "aa"]);

        let empty = store
            .vote_exts_by_height(&state, 99, &PageRequest::default())
            .unwrap();
        assert!(empty.items.is_empty());
    }

    #[test]
    fn all_records_page_in_index_order() {
        let store = VoteExtStore::new();
        let mut state = MemoryState::new();
        store_all(
            &store,
            &mut state,
            &[record(4, "bb"), record(3, "aa"), record(3, "bb")],
        );
        let page = store
            .all_vote_exts(
                &state,
                &PageRequest {
                    offset: 0,
                    limit: 2,
                    count_total: true,
                },
            )
            .unwrap();
        let indexes: Vec<_> = page.items.iter().map(|r| r.index.as_str()).collect();
        assert_eq!(indexes, vec!["3/aa", "3/bb"]);
        assert_eq!(page.pagination.total, Some(3));
        assert_eq!(page.pagination.next_offset, Some(2));
    }
}
