// Path: crates/state/src/memory/mod.rs
//! An ordered, in-memory `StateAccess` backend.

use crate::commitment::StateCommitment;
use pulsar_api::state::{prefix_upper_bound, StateAccess, StateScanIter};
use pulsar_types::error::StateError;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::Arc;

/// A `BTreeMap`-backed state. Scans return keys in ascending byte order.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    version: u64,
}

impl MemoryState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of stored keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the state holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Incremented once per successful `batch_apply`.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The commitment to the current contents.
    pub fn root_hash(&self) -> StateCommitment {
        StateCommitment::from_ordered_pairs(
            self.data.iter().map(|(k, v)| (k.as_slice(), v.as_slice())),
        )
    }
}

impl StateAccess for MemoryState {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.data.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.data.remove(key);
        Ok(())
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        for key in deletes {
            self.data.remove(key);
        }
        self.batch_set(inserts)?;
        self.version += 1;
        tracing::trace!(
            target: "state",
            inserts = inserts.len(),
            deletes = deletes.len(),
            version = self.version,
            "applied batch"
        );
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let end = match prefix_upper_bound(prefix) {
            Some(ub) => Excluded(ub),
            None => Unbounded,
        };
        let iter = self
            .data
            .range((Included(prefix.to_vec()), end))
            .map(|(k, v)| Ok((Arc::from(k.as_slice()), Arc::from(v.as_slice()))));
        Ok(Box::new(iter))
    }
}
