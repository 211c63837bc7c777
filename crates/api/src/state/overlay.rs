// Path: crates/api/src/state/overlay.rs

//! A copy-on-write state overlay for staging a transaction's writes.

use crate::state::{StateAccess, StateKVPair, StateScanIter};
use pulsar_types::error::StateError;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::{Fuse, Peekable};
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::Arc;

/// A batch of key-value pairs to be inserted or updated in the state.
pub type StateInserts = Vec<(Vec<u8>, Vec<u8>)>;

/// A batch of keys to be deleted from the state.
pub type StateDeletes = Vec<Vec<u8>>;

/// A complete set of state changes (inserts/updates and deletes) from a transaction.
pub type StateChangeSet = (StateInserts, StateDeletes);

/// Calculates the smallest byte vector that is strictly greater than all keys
/// starting with the given prefix. Returns None if the prefix is empty or all 0xFF bytes.
pub fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    if prefix.is_empty() {
        return None;
    }
    let mut ub = prefix.to_vec();
    for i in (0..ub.len()).rev() {
        if let Some(byte) = ub.get_mut(i) {
            if *byte != 0xFF {
                *byte += 1;
                ub.truncate(i + 1);
                return Some(ub);
            }
        }
    }
    None
}

/// Applies a change set produced by [`StateOverlay::into_ordered_batch`] to `target`
/// through a single `batch_apply`.
pub fn commit_change_set(
    target: &mut dyn StateAccess,
    changes: StateChangeSet,
) -> Result<(), StateError> {
    let (inserts, deletes) = changes;
    if inserts.is_empty() && deletes.is_empty() {
        return Ok(());
    }
    target.batch_apply(&inserts, &deletes)
}

struct MergingIterator<'a> {
    base: Peekable<Fuse<StateScanIter<'a>>>,
    writes: Peekable<btree_map::Range<'a, Vec<u8>, Option<Vec<u8>>>>,
}

impl<'a> Iterator for MergingIterator<'a> {
    type Item = Result<StateKVPair, StateError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let base_key = self
                .base
                .peek()
                .and_then(|res| res.as_ref().ok().map(|(k, _)| k.as_ref()));
            let write_key = self.writes.peek().map(|(k, _)| k.as_slice());

            let decision = match (base_key, write_key) {
                (Some(bk), Some(wk)) => bk.cmp(wk),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                // Both exhausted, or the base yielded an error to surface.
                (None, None) => return self.base.next(),
            };

            match decision {
                std::cmp::Ordering::Less => return self.base.next(),
                std::cmp::Ordering::Greater => {
                    if let Some((key, Some(val))) = self.writes.next() {
                        return Some(Ok((Arc::from(key.clone()), Arc::from(val.clone()))));
                    }
                }
                std::cmp::Ordering::Equal => {
                    self.base.next(); // shadowed by the overlay
                    if let Some((key, Some(val))) = self.writes.next() {
                        return Some(Ok((Arc::from(key.clone()), Arc::from(val.clone()))));
                    }
                }
            }
        }
    }
}

/// An in-memory, copy-on-write overlay for any `StateAccess`.
///
/// Reads are first checked against the local `writes` cache. If a key is not
/// found, the read is passed through to the underlying `base` state.
/// All writes are captured in the local cache and do not affect the `base` state
/// until the caller commits them with [`commit_change_set`].
#[derive(Clone)]
pub struct StateOverlay<'a> {
    base: &'a dyn StateAccess,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>, // deterministic commit order
}

impl<'a> StateOverlay<'a> {
    /// Creates a new, empty overlay on top of a base state accessor.
    pub fn new(base: &'a dyn StateAccess) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// The number of staged writes (inserts and deletes).
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Consumes the overlay and returns its writes in a deterministic order.
    pub fn into_ordered_batch(self) -> StateChangeSet {
        let mut inserts = Vec::new();
        let mut deletes = Vec::new();

        for (key, value_opt) in self.writes {
            match value_opt {
                Some(value) => inserts.push((key, value)),
                None => deletes.push(key),
            }
        }
        (inserts, deletes)
    }
}

impl<'a> StateAccess for StateOverlay<'a> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.writes.get(key) {
            Some(value_opt) => Ok(value_opt.clone()),
            None => self.base.get(key),
        }
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let base = self.base.prefix_scan(prefix)?.fuse().peekable();

        let start = Included(prefix.to_vec());
        let end = match prefix_upper_bound(prefix) {
            Some(ub) => Excluded(ub),
            None => Unbounded,
        };
        let writes = self.writes.range((start, end)).peekable();

        Ok(Box::new(MergingIterator { base, writes }))
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        for key in deletes {
            self.delete(key)?;
        }
        for (key, value) in inserts {
            self.insert(key, value)?;
        }
        Ok(())
    }
}
