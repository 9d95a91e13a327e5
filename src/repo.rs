// src/repo.rs

use crate::cache::CommitCache;
use crate::error::{Error, Result};
use crate::model::{AnnotatedTag, Commit, RepoId, Tagger};
use git2::{ErrorCode, ObjectType, Oid, Repository, Signature, Time};
use log::debug;
use std::path::Path;
use std::sync::Arc;

/// Read access to commits of one repository.
pub trait ObjectStore {
    fn identity(&self) -> &RepoId;

    /// The cache this handle resolves commits through.
    fn cache(&self) -> &CommitCache;

    /// Decodes a commit straight from the store. `Ok(None)` if it does not exist.
    fn read_commit(&self, oid: Oid) -> Result<Option<Commit>>;

    /// Cached lookup. A missing commit is a repository error here.
    fn lookup(&self, oid: Oid) -> Result<Arc<Commit>> {
        self.cache().lookup(self, oid)?.ok_or_else(|| Error::CommitNotFound {
            repo: self.identity().to_string(),
            oid,
        })
    }
}

/// Annotated tag access of one repository.
pub trait TagStore {
    /// All annotated tags, sorted by name. Lightweight tags are left out.
    fn annotated_tags(&self) -> Result<Vec<AnnotatedTag>>;

    fn has_tag(&self, name: &str) -> Result<bool>;

    /// Creates an annotated tag on `target`, returning the new tag object id.
    fn create_tag(&self, name: &str, target: Oid, tagger: &Tagger, message: &str) -> Result<Oid>;
}

/// A git repository on disk, accessed through git2
pub struct GitRepo {
    repo: Repository,
    id: RepoId,
    cache: CommitCache,
}

impl GitRepo {
    /// Opens the repository at `path`, resolving commits through `cache`.
    pub fn open(path: &Path, cache: CommitCache) -> Result<Self> {
        let repo = Repository::open(path)?;
        Ok(Self::from_repository(repo, cache))
    }

    pub fn from_repository(repo: Repository, cache: CommitCache) -> Self {
        let git_dir = repo.path();
        let id = std::fs::canonicalize(git_dir).unwrap_or_else(|_| git_dir.to_path_buf());
        GitRepo {
            id: RepoId::new(id.display().to_string()),
            repo,
            cache,
        }
    }

    /// Resolves a revision (branch, ref name, hash) to the commit it points at.
    pub fn resolve_commit(&self, spec: &str) -> Result<Oid> {
        let commit = self.repo.revparse_single(spec)?.peel_to_commit()?;
        Ok(commit.id())
    }

    /// Like [`resolve_commit`](Self::resolve_commit), but an unknown or unborn
    /// reference gives `None` instead of an error.
    pub fn try_resolve_commit(&self, spec: &str) -> Result<Option<Oid>> {
        match self.resolve_commit(spec) {
            Ok(oid) => Ok(Some(oid)),
            Err(Error::Git(e))
                if e.code() == ErrorCode::NotFound || e.code() == ErrorCode::UnbornBranch =>
            {
                debug!("{} has no commit at {}", self.id, spec);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn read_annotated_tag(&self, name: &str) -> Result<Option<AnnotatedTag>> {
        let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
        let Some(oid) = reference.target() else {
            return Ok(None);
        };
        let object = self.repo.find_object(oid, None)?;
        let Some(tag) = object.as_tag() else {
            debug!("skipping lightweight tag {}", name);
            return Ok(None);
        };

        let tagger = tag.tagger().map(|sig| Tagger {
            name: sig.name().unwrap_or("Unknown").to_string(),
            email: sig.email().unwrap_or("").to_string(),
            time: sig.when().seconds(),
            offset_minutes: sig.when().offset_minutes(),
        });
        let message = tag
            .message_bytes()
            .map(|m| String::from_utf8_lossy(m).into_owned())
            .unwrap_or_default();
        let target = match object.peel_to_commit() {
            Ok(commit) => commit.id(),
            Err(e) if matches!(e.code(), ErrorCode::Peel | ErrorCode::InvalidSpec) => {
                debug!("skipping tag {} which does not point at a commit", name);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Some(AnnotatedTag {
            name: name.to_string(),
            target,
            tagger,
            message,
        }))
    }
}

impl ObjectStore for GitRepo {
    fn identity(&self) -> &RepoId {
        &self.id
    }

    fn cache(&self) -> &CommitCache {
        &self.cache
    }

    fn read_commit(&self, oid: Oid) -> Result<Option<Commit>> {
        let commit = match self.repo.find_commit(oid) {
            Ok(commit) => commit,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let author_time = commit.author().when().seconds();
        let snapshot = Commit {
            id: commit.id(),
            parents: commit.parent_ids().collect(),
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
            author_time,
            commit_time: commit.time().seconds(),
        };
        Ok(Some(snapshot))
    }
}

impl TagStore for GitRepo {
    fn annotated_tags(&self) -> Result<Vec<AnnotatedTag>> {
        let names = self.repo.tag_names(None)?;
        let mut names: Vec<&str> = names.iter().flatten().collect();
        names.sort_unstable();

        let mut tags = Vec::new();
        for name in names {
            if let Some(tag) = self.read_annotated_tag(name)? {
                tags.push(tag);
            }
        }
        Ok(tags)
    }

    fn has_tag(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn create_tag(&self, name: &str, target: Oid, tagger: &Tagger, message: &str) -> Result<Oid> {
        let object = self.repo.find_object(target, Some(ObjectType::Commit))?;
        let time = Time::new(tagger.time, tagger.offset_minutes);
        let signature = Signature::new(&tagger.name, &tagger.email, &time)?;
        Ok(self.repo.tag(name, &object, &signature, message, false)?)
    }
}
