// src/merge_points.rs

//! Maps every commit of the upstream DAG to the mainline commit that brought
//! it onto the mainline.
//!
//! Mainline commits map to themselves. A commit on a topic branch maps to the
//! earliest merge whose non-first parents reach it. The mainline is processed
//! oldest first and exploration stops at commits that already have a merge
//! point, so every commit is visited once however many merges share it.

use crate::error::Result;
use crate::model::{Commit, FirstParentChain};
use crate::repo::ObjectStore;
use git2::Oid;
use log::debug;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Merge point of every commit reachable from the upstream tip
#[derive(Debug, Clone, Default)]
pub struct MergePoints {
    points: HashMap<Oid, Arc<Commit>>,
}

impl MergePoints {
    pub fn get(&self, oid: Oid) -> Option<&Arc<Commit>> {
        self.points.get(&oid)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Oid, &Arc<Commit>)> {
        self.points.iter()
    }
}

pub fn merge_points<S>(store: &S, mainline: &FirstParentChain) -> Result<MergePoints>
where
    S: ObjectStore + ?Sized,
{
    let mut points: HashMap<Oid, Arc<Commit>> = HashMap::new();
    let mut queue = VecDeque::new();
    let mut merges = 0usize;

    for commit in mainline {
        points.entry(commit.id).or_insert_with(|| commit.clone());

        if commit.is_merge() {
            merges += 1;
        }
        queue.extend(commit.parents.iter().skip(1).copied());

        while let Some(oid) = queue.pop_front() {
            if let Entry::Vacant(slot) = points.entry(oid) {
                slot.insert(commit.clone());
                let ancestor = store.lookup(oid)?;
                queue.extend(ancestor.parents.iter().copied());
            }
        }
    }

    debug!(
        "{}: {} commits absorbed by {} mainline commits ({} merges)",
        store.identity(),
        points.len(),
        mainline.len(),
        merges
    );
    Ok(MergePoints { points })
}
