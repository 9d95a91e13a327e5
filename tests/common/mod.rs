// tests/common/mod.rs

#![allow(dead_code)]

use git2::{Oid, Repository, Signature, Time};
use std::path::Path;

pub const BRANCH: &str = "refs/heads/master";

/// A repository on disk with a fake clock for commit times
pub struct Fixture {
    pub repo: Repository,
    clock: i64,
}

impl Fixture {
    pub fn init(path: &Path) -> Self {
        let repo = Repository::init(path).expect("failed to initialize repository");
        repo.set_head(BRANCH).expect("failed to point HEAD at master");
        Fixture { repo, clock: 1_500_000_000 }
    }

    fn signature(&mut self, name: &str) -> Signature<'static> {
        self.clock += 60;
        Signature::new(name, "dev@example.com", &Time::new(self.clock, 0)).unwrap()
    }

    /// Commits a tree holding a single file without moving any branch.
    pub fn commit(&mut self, parents: &[Oid], message: &str) -> Oid {
        let sig = self.signature("Developer");
        let blob = self.repo.blob(message.as_bytes()).unwrap();
        let mut builder = self.repo.treebuilder(None).unwrap();
        builder.insert("file.txt", blob, 0o100644).unwrap();
        let tree = self.repo.find_tree(builder.write().unwrap()).unwrap();
        let parents: Vec<_> = parents.iter().map(|p| self.repo.find_commit(*p).unwrap()).collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        self.repo.commit(None, &sig, &sig, message, &tree, &parent_refs).unwrap()
    }

    /// Commits and advances master.
    pub fn commit_on_branch(&mut self, parents: &[Oid], message: &str) -> Oid {
        let oid = self.commit(parents, message);
        self.repo.reference(BRANCH, oid, true, "test commit").unwrap();
        oid
    }

    pub fn annotated_tag(&mut self, name: &str, target: Oid, message: &str) -> Oid {
        let sig = self.signature("Release Manager");
        let object = self.repo.find_object(target, None).unwrap();
        self.repo.tag(name, &object, &sig, message, false).unwrap()
    }

    pub fn lightweight_tag(&self, name: &str, target: Oid) {
        let object = self.repo.find_object(target, None).unwrap();
        self.repo.tag_lightweight(name, &object, false).unwrap();
    }
}

pub fn trailer(subject: &str, upstream: Oid) -> String {
    format!("{}\n\nKubernetes-commit: {}\n", subject, upstream)
}
