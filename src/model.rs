// src/model.rs

use git2::Oid;
use std::fmt;
use std::sync::Arc;

/// Identifies one repository handle. Part of every commit cache key, so equal
/// hashes from two repositories are never conflated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId(String);

impl RepoId {
    pub fn new(id: impl Into<String>) -> Self {
        RepoId(id.into())
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only snapshot of a commit decoded from the object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: Oid,
    /// Ordered parents, the first one is the mainline parent
    pub parents: Vec<Oid>,
    pub message: String,
    pub author_time: i64,
    pub commit_time: i64,
}

impl Commit {
    pub fn first_parent(&self) -> Option<Oid> {
        self.parents.first().copied()
    }

    /// The first line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Commits reachable from a tip by following first parents only.
///
/// Always ordered oldest to newest: the root comes first, the tip last.
#[derive(Debug, Clone, Default)]
pub struct FirstParentChain {
    commits: Vec<Arc<Commit>>,
}

impl FirstParentChain {
    /// Builds a chain from commits ordered oldest to newest.
    pub fn from_oldest_first(commits: Vec<Arc<Commit>>) -> Self {
        FirstParentChain { commits }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Commit>> {
        self.commits.iter()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn root(&self) -> Option<&Arc<Commit>> {
        self.commits.first()
    }

    pub fn tip(&self) -> Option<&Arc<Commit>> {
        self.commits.last()
    }

    /// Index of `oid` counted from the root, if it lies on the chain.
    pub fn position(&self, oid: Oid) -> Option<usize> {
        self.commits.iter().position(|c| c.id == oid)
    }

    pub fn contains(&self, oid: Oid) -> bool {
        self.position(oid).is_some()
    }
}

impl<'a> IntoIterator for &'a FirstParentChain {
    type Item = &'a Arc<Commit>;
    type IntoIter = std::slice::Iter<'a, Arc<Commit>>;

    fn into_iter(self) -> Self::IntoIter {
        self.commits.iter()
    }
}

/// Who signed an annotated tag, and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagger {
    pub name: String,
    pub email: String,
    pub time: i64,
    /// Offset from UTC in minutes
    pub offset_minutes: i32,
}

/// An annotated tag, peeled down to the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedTag {
    pub name: String,
    pub target: Oid,
    pub tagger: Option<Tagger>,
    pub message: String,
}
