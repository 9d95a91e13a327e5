// src/history.rs

use crate::error::{Error, Result};
use crate::model::FirstParentChain;
use crate::repo::ObjectStore;
use git2::Oid;
use log::debug;
use std::collections::HashSet;

/// Collects the mainline of `tip` by following first parents down to the root.
///
/// The returned chain is ordered oldest to newest.
pub fn first_parent_list<S: ObjectStore + ?Sized>(store: &S, tip: Oid) -> Result<FirstParentChain> {
    let mut commits = Vec::new();
    let mut seen = HashSet::new();
    let mut next = Some(tip);

    while let Some(oid) = next {
        if !seen.insert(oid) {
            return Err(Error::HistoryCycle {
                repo: store.identity().to_string(),
                oid,
            });
        }
        let commit = store.lookup(oid)?;
        next = commit.first_parent();
        commits.push(commit);
    }
    commits.reverse();

    debug!("{}: {} first-parent commits below {}", store.identity(), commits.len(), tip);
    Ok(FirstParentChain::from_oldest_first(commits))
}
