// src/cache.rs

//! Memoized commit lookups.
//!
//! Correlation walks the same commits several times (first-parent walk,
//! merge-point exploration, trailer extraction). Each decode goes through a
//! [`CommitCache`] owned by the repository handle so it happens once per run.

use crate::error::{Error, Result};
use crate::model::{Commit, RepoId};
use crate::repo::ObjectStore;
use git2::Oid;
use log::trace;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A `None` entry records that the commit is absent from the store.
type Entries = HashMap<(RepoId, Oid), Option<Arc<Commit>>>;

/// Commit cache keyed by repository identity and hash.
///
/// Clones share the same entries, so one cache can back several handles.
#[derive(Debug, Clone, Default)]
pub struct CommitCache {
    entries: Arc<Mutex<Entries>>,
}

impl CommitCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the commit `oid` of `store`, decoding it on first use.
    ///
    /// `Ok(None)` means the store does not have the commit; that answer is
    /// cached too. Any other store failure is returned and not cached.
    pub fn lookup<S>(&self, store: &S, oid: Oid) -> Result<Option<Arc<Commit>>>
    where
        S: ObjectStore + ?Sized,
    {
        let key = (store.identity().clone(), oid);

        {
            let entries = self.entries.lock().map_err(|_| Error::LockPoisoned)?;
            if let Some(cached) = entries.get(&key) {
                return Ok(cached.clone());
            }
        }

        // Decode outside the lock
        trace!("decoding commit {} from {}", oid, key.0);
        let decoded = store.read_commit(oid)?.map(Arc::new);

        let mut entries = self.entries.lock().map_err(|_| Error::LockPoisoned)?;
        let entry = entries.entry(key).or_insert(decoded);
        Ok(entry.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{oid, MemoryStore};

    #[test]
    fn decodes_each_commit_once() {
        let store = MemoryStore::linear("up", 3);
        let cache = CommitCache::new();

        let first = cache.lookup(&store, oid(2)).unwrap().unwrap();
        let second = cache.lookup(&store, oid(2)).unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.reads(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remembers_missing_commits() {
        let store = MemoryStore::linear("up", 1);
        let cache = CommitCache::new();

        assert!(cache.lookup(&store, oid(99)).unwrap().is_none());
        assert!(cache.lookup(&store, oid(99)).unwrap().is_none());
        assert_eq!(store.reads(), 1);
    }

    #[test]
    fn same_hash_in_two_repositories_is_not_conflated() {
        let mut up = MemoryStore::new("up");
        up.add(1, &[], "upstream root");
        let mut down = MemoryStore::new("down");
        down.add(1, &[], "downstream root");

        let cache = CommitCache::new();
        let a = cache.lookup(&up, oid(1)).unwrap().unwrap();
        let b = cache.lookup(&down, oid(1)).unwrap().unwrap();

        assert_eq!(a.message, "upstream root");
        assert_eq!(b.message, "downstream root");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::linear("up", 2);
        let cache = CommitCache::new();
        let shared = cache.clone();

        cache.lookup(&store, oid(1)).unwrap();
        shared.lookup(&store, oid(1)).unwrap();

        assert_eq!(store.reads(), 1);
        assert!(!shared.is_empty());
    }

    #[test]
    fn store_failures_propagate_and_are_not_cached() {
        let mut store = MemoryStore::linear("up", 1);
        store.fail_on(oid(1));
        let cache = CommitCache::new();

        assert!(matches!(cache.lookup(&store, oid(1)), Err(Error::Git(_))));
        assert!(cache.is_empty());
    }
}
