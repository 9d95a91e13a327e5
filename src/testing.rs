// src/testing.rs

//! In-memory object and tag stores for unit tests.

use crate::cache::CommitCache;
use crate::error::Result;
use crate::model::{AnnotatedTag, Commit, RepoId, Tagger};
use crate::repo::{ObjectStore, TagStore};
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Deterministic hash for commit number `n`.
pub(crate) fn oid(n: u64) -> Oid {
    Oid::from_str(&format!("{:040x}", n)).unwrap()
}

pub(crate) fn tagger() -> Tagger {
    Tagger {
        name: "Release Bot".to_string(),
        email: "release@example.com".to_string(),
        time: 1_500_000_000,
        offset_minutes: 60,
    }
}

pub(crate) struct MemoryStore {
    id: RepoId,
    cache: CommitCache,
    commits: HashMap<Oid, Commit>,
    failing: HashSet<Oid>,
    reads: Cell<usize>,
    tags: RefCell<BTreeMap<String, AnnotatedTag>>,
    lightweight: BTreeMap<String, Oid>,
}

impl MemoryStore {
    pub(crate) fn new(name: &str) -> Self {
        MemoryStore {
            id: RepoId::new(name),
            cache: CommitCache::new(),
            commits: HashMap::new(),
            failing: HashSet::new(),
            reads: Cell::new(0),
            tags: RefCell::new(BTreeMap::new()),
            lightweight: BTreeMap::new(),
        }
    }

    /// Commits 1..=n, each the first parent of the next.
    pub(crate) fn linear(name: &str, n: u64) -> Self {
        let mut store = Self::new(name);
        for i in 1..=n {
            let parents: Vec<u64> = if i == 1 { vec![] } else { vec![i - 1] };
            store.add(i, &parents, &format!("commit {}", i));
        }
        store
    }

    pub(crate) fn add(&mut self, n: u64, parents: &[u64], message: &str) -> Oid {
        let id = oid(n);
        self.commits.insert(
            id,
            Commit {
                id,
                parents: parents.iter().map(|&p| oid(p)).collect(),
                message: message.to_string(),
                author_time: n as i64 * 60,
                commit_time: n as i64 * 60,
            },
        );
        id
    }

    pub(crate) fn add_tag(&mut self, name: &str, target: u64, message: &str) {
        self.tags.borrow_mut().insert(
            name.to_string(),
            AnnotatedTag {
                name: name.to_string(),
                target: oid(target),
                tagger: Some(tagger()),
                message: message.to_string(),
            },
        );
    }

    pub(crate) fn add_lightweight_tag(&mut self, name: &str, target: u64) {
        self.lightweight.insert(name.to_string(), oid(target));
    }

    pub(crate) fn tag(&self, name: &str) -> Option<AnnotatedTag> {
        self.tags.borrow().get(name).cloned()
    }

    pub(crate) fn fail_on(&mut self, oid: Oid) {
        self.failing.insert(oid);
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl ObjectStore for MemoryStore {
    fn identity(&self) -> &RepoId {
        &self.id
    }

    fn cache(&self) -> &CommitCache {
        &self.cache
    }

    fn read_commit(&self, oid: Oid) -> Result<Option<Commit>> {
        self.reads.set(self.reads.get() + 1);
        if self.failing.contains(&oid) {
            return Err(git2::Error::from_str("object store is corrupt").into());
        }
        Ok(self.commits.get(&oid).cloned())
    }
}

impl TagStore for MemoryStore {
    fn annotated_tags(&self) -> Result<Vec<AnnotatedTag>> {
        Ok(self.tags.borrow().values().cloned().collect())
    }

    fn has_tag(&self, name: &str) -> Result<bool> {
        Ok(self.tags.borrow().contains_key(name) || self.lightweight.contains_key(name))
    }

    fn create_tag(&self, name: &str, target: Oid, tagger: &Tagger, message: &str) -> Result<Oid> {
        self.tags.borrow_mut().insert(
            name.to_string(),
            AnnotatedTag {
                name: name.to_string(),
                target,
                tagger: Some(tagger.clone()),
                message: message.to_string(),
            },
        );
        Ok(target)
    }
}
