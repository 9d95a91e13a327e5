// src/error.rs

//! Error type shared by the correlation engine and the tag applicator.
//!
//! Repository errors (decode failures, missing commits, broken history) are
//! fatal for a correlation pass. `CorrelationGap` and `TagNotFound` are
//! per-tag conditions that callers report and move past.

use git2::Oid;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The git object store reported a failure.
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// A commit referenced from history is missing from the object store,
    /// e.g. in a shallow or corrupt checkout.
    #[error("commit {oid} not found in repository {repo}")]
    CommitNotFound { repo: String, oid: Oid },

    /// Following first parents came back to a commit already visited.
    #[error("first-parent history of repository {repo} loops back to {oid}")]
    HistoryCycle { repo: String, oid: Oid },

    /// No downstream commit is known for this upstream commit.
    #[error("no downstream commit corresponds to upstream commit {oid}")]
    CorrelationGap { oid: Oid },

    /// An upstream tag name could not be resolved.
    #[error("tag {name} not found")]
    TagNotFound { name: String },

    #[error("commit cache lock poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error concerns a single tag or pin and the run may go on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::CorrelationGap { .. } | Error::TagNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
