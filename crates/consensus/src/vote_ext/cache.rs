// Path: crates/consensus/src/vote_ext/cache.rs
use parking_lot::RwLock;
use std::collections::BTreeMap;

type HeightVotes = BTreeMap<String, Vec<u8>>;

/// Raw vote-extension bytes per height and signer, held in memory between
/// the callbacks of consecutive heights.
#[derive(Debug, Default)]
pub struct VoteCache {
    votes: RwLock<BTreeMap<u64, HeightVotes>>,
}

impl VoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) `signer`'s extension for `height`.
    pub fn store_vote(&self, height: u64, signer: &str, extension: Vec<u8>) {
        self.votes
            .write()
            .entry(height)
            .or_default()
            .insert(signer.to_string(), extension);
    }

    /// A copy of the votes for `height`.
    pub fn fetch_votes(&self, height: u64) -> HeightVotes {
        self.votes.read().get(&height).cloned().unwrap_or_default()
    }

    /// One signer's vote for `height`.
    pub fn vote(&self, height: u64, signer: &str) -> Option<Vec<u8>> {
        self.votes
            .read()
            .get(&height)
            .and_then(|votes| votes.get(signer))
            .cloned()
    }

    /// Number of votes held for `height`.
    pub fn count(&self, height: u64) -> usize {
        self.votes.read().get(&height).map_or(0, BTreeMap::len)
    }

    /// Drops every vote for `height`.
    pub fn delete_votes(&self, height: u64) {
        self.votes.write().remove(&height);
    }

    /// Drops every height below `min_height`.
    pub fn prune_below(&self, min_height: u64) {
        let mut votes = self.votes.write();
        *votes = votes.split_off(&min_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn fetch_returns_a_copy() {
        let cache = VoteCache::new();
        cache.store_vote(5, "B62a", vec![1]);
        let mut copy = cache.fetch_votes(5);
        copy.insert("B62b".into(), vec![2]);
        assert_eq!(cache.count(5), 1);
        assert_eq!(cache.vote(5, "B62a"), Some(vec![1]));
        assert!(cache.fetch_votes(6).is_empty());
    }

    #[test]
    fn delete_and_prune() {
        let cache = VoteCache::new();
        for h in 1..=4 {
            cache.store_vote(h, "B62a", vec![h as u8]);
        }
        cache.delete_votes(4);
        assert_eq!(cache.count(4), 0);
        cache.prune_below(3);
        assert_eq!(cache.count(2), 0);
        assert_eq!(cache.count(3), 1);
    }

    #[test]
    fn concurrent_writers_do_not_lose_votes() {
        let cache = Arc::new(VoteCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.store_vote(7, &format!("v{}", i), vec![i]))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.count(7), 8);
    }
}
