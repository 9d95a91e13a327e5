// src/lib.rs

//! Correlates a monorepo's mainline with a downstream repository filtered out
//! of it, and uses that correlation to recreate release tags downstream and
//! to pick the commit a dependency should be pinned to for a given tag.

pub mod cache;
pub mod correlate;
pub mod error;
pub mod history;
pub mod merge_points;
pub mod model;
pub mod repo;
pub mod source_hash;
pub mod tags;

#[cfg(test)]
mod testing;

pub use cache::CommitCache;
pub use correlate::{correlate, correlate_histories, Correlation, HistoryCorrelation};
pub use error::{Error, Result};
pub use history::first_parent_list;
pub use merge_points::{merge_points, MergePoints};
pub use model::{AnnotatedTag, Commit, FirstParentChain, RepoId, Tagger};
pub use repo::{GitRepo, ObjectStore, TagStore};
pub use source_hash::{SourceHash, TrailerParser};
pub use tags::{
    pin_commits, resolve_pin_commit, resolve_tag_target, sync_tags, SyncReport, TagNamer,
    TagOutcome,
};
