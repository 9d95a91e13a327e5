// src/correlate.rs

//! Upstream → downstream commit correlation.
//!
//! Downstream commits name their upstream origin in a trailer. Those sparse
//! links are first lifted onto the upstream mainline through the merge-point
//! table, then carried forward along the mainline so that every upstream
//! commit maps to the newest downstream commit that includes its effects.

use crate::error::Result;
use crate::history::first_parent_list;
use crate::merge_points::{merge_points, MergePoints};
use crate::model::FirstParentChain;
use crate::repo::ObjectStore;
use crate::source_hash::{SourceHash, TrailerParser};
use git2::Oid;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::Write;

/// Mapping from upstream mainline commits to downstream commits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correlation {
    map: HashMap<Oid, Oid>,
    direct: usize,
}

impl Correlation {
    pub fn get(&self, upstream: Oid) -> Option<Oid> {
        self.map.get(&upstream).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of mainline commits linked directly by a downstream trailer
    pub fn direct_links(&self) -> usize {
        self.direct
    }

    /// True when no downstream commit could be linked to the upstream mainline.
    pub fn is_degenerate(&self) -> bool {
        self.direct == 0
    }

    /// Writes one `<upstream> <downstream> <summary>` row per mainline commit,
    /// oldest first. Unmapped commits get the all-zero hash.
    pub fn write_mapping<W: Write>(&self, out: &mut W, upstream: &FirstParentChain) -> Result<()> {
        for commit in upstream {
            let downstream = self.get(commit.id).unwrap_or_else(Oid::zero);
            writeln!(out, "{} {} {}", commit.id, downstream, commit.summary())?;
        }
        Ok(())
    }
}

pub fn correlate(
    upstream: &FirstParentChain,
    downstream: &FirstParentChain,
    merge_points: &MergePoints,
    parser: &TrailerParser,
) -> Correlation {
    // 1. Direct links: mainline merge point -> downstream commit naming it
    let mut direct: HashMap<Oid, Oid> = HashMap::new();
    for commit in downstream {
        let source = match parser.source_hash(commit) {
            SourceHash::Found(oid) => oid,
            SourceHash::Absent => continue,
            SourceHash::Malformed { text } => {
                warn!(
                    "downstream commit {} has an unparsable source hash {:?}, ignoring it",
                    commit.id, text
                );
                continue;
            }
        };
        let Some(point) = merge_points.get(source) else {
            debug!(
                "downstream commit {} names {} which is not on the upstream mainline",
                commit.id, source
            );
            continue;
        };
        direct.entry(point.id).or_insert(commit.id);
    }

    // 2. Carry the newest known downstream commit forward along the mainline.
    // A downstream root that links to nothing on the mainline stands in for
    // everything before the first link.
    let mut cursor = downstream
        .root()
        .map(|root| root.id)
        .filter(|root| !direct.values().any(|linked| linked == root));

    let mut map = HashMap::with_capacity(upstream.len());
    for commit in upstream {
        if let Some(&linked) = direct.get(&commit.id) {
            cursor = Some(linked);
        }
        if let Some(current) = cursor {
            map.insert(commit.id, current);
        }
    }

    let correlation = Correlation {
        map,
        direct: direct.len(),
    };
    if correlation.is_degenerate() {
        warn!(
            "no downstream commit links to the upstream mainline \
             ({} upstream, {} downstream commits)",
            upstream.len(),
            downstream.len()
        );
    } else {
        debug!(
            "{} direct links, {} of {} upstream commits mapped",
            correlation.direct,
            correlation.len(),
            upstream.len()
        );
    }
    correlation
}

/// Upstream chain and its correlation with a downstream branch
#[derive(Debug, Clone)]
pub struct HistoryCorrelation {
    pub upstream: FirstParentChain,
    pub downstream: FirstParentChain,
    pub correlation: Correlation,
}

/// Walks both histories and correlates them.
///
/// `downstream_tip` is `None` for a downstream branch without commits.
pub fn correlate_histories<U, D>(
    upstream: &U,
    upstream_tip: Oid,
    downstream: &D,
    downstream_tip: Option<Oid>,
    parser: &TrailerParser,
) -> Result<HistoryCorrelation>
where
    U: ObjectStore + ?Sized,
    D: ObjectStore + ?Sized,
{
    let upstream_chain = first_parent_list(upstream, upstream_tip)?;
    let downstream_chain = match downstream_tip {
        Some(tip) => first_parent_list(downstream, tip)?,
        None => FirstParentChain::default(),
    };
    let points = merge_points(upstream, &upstream_chain)?;
    let correlation = correlate(&upstream_chain, &downstream_chain, &points, parser);

    info!(
        "correlated {} upstream with {} downstream mainline commits",
        upstream_chain.len(),
        downstream_chain.len()
    );
    Ok(HistoryCorrelation {
        upstream: upstream_chain,
        downstream: downstream_chain,
        correlation,
    })
}
