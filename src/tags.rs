// src/tags.rs

use crate::correlate::Correlation;
use crate::error::{Error, Result};
use crate::model::{AnnotatedTag, Tagger};
use crate::repo::TagStore;
use chrono::{TimeZone, Utc};
use git2::Oid;
use indicatif::ProgressBar;
use log::{debug, info, warn};

pub const DEFAULT_TAG_PREFIX: &str = "kubernetes-";

/// Downstream commit to tag for an upstream tag pointing at `target`.
pub fn resolve_tag_target(correlation: &Correlation, target: Oid) -> Result<Oid> {
    correlation.get(target).ok_or(Error::CorrelationGap { oid: target })
}

/// Commit of a dependency repository to pin for the upstream tag at `target`.
///
/// Same lookup as [`resolve_tag_target`], against the dependency's own
/// correlation, so tags of independently filtered repositories agree.
pub fn resolve_pin_commit(correlation: &Correlation, target: Oid) -> Result<Oid> {
    correlation.get(target).ok_or(Error::CorrelationGap { oid: target })
}

/// Translates upstream release tag names, `v1.9.2` -> `kubernetes-1.9.2`
#[derive(Debug, Clone)]
pub struct TagNamer {
    prefix: String,
}

impl Default for TagNamer {
    fn default() -> Self {
        TagNamer::new(DEFAULT_TAG_PREFIX)
    }
}

impl TagNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        TagNamer { prefix: prefix.into() }
    }

    /// `None` for names that do not start with `v`.
    pub fn downstream_name(&self, upstream: &str) -> Option<String> {
        upstream
            .strip_prefix('v')
            .filter(|rest| !rest.is_empty())
            .map(|rest| format!("{}{}", self.prefix, rest))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// Annotated tag created downstream (or would be, in a dry run)
    Created { upstream: String, downstream: String, commit: Oid },
    /// Downstream already has a tag with that name
    Exists { downstream: String },
    /// The tagged upstream commit has no downstream equivalent
    Skipped { upstream: String, reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub outcomes: Vec<TagOutcome>,
}

impl SyncReport {
    pub fn created(&self) -> impl Iterator<Item = &TagOutcome> {
        self.outcomes.iter().filter(|o| matches!(o, TagOutcome::Created { .. }))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &TagOutcome> {
        self.outcomes.iter().filter(|o| matches!(o, TagOutcome::Skipped { .. }))
    }

    pub fn existing(&self) -> impl Iterator<Item = &TagOutcome> {
        self.outcomes.iter().filter(|o| matches!(o, TagOutcome::Exists { .. }))
    }
}

/// Recreates the annotated release tags of `upstream` in `downstream`.
///
/// Tags whose commit has no downstream equivalent are skipped with a warning.
/// Repository failures abort the run.
pub fn sync_tags<U, D>(
    upstream: &U,
    downstream: &D,
    correlation: &Correlation,
    namer: &TagNamer,
    dry_run: bool,
) -> Result<SyncReport>
where
    U: TagStore + ?Sized,
    D: TagStore + ?Sized,
{
    let tags = upstream.annotated_tags()?;
    let mut report = SyncReport::default();

    let bar = ProgressBar::new(tags.len() as u64);
    bar.set_message("Syncing tags");

    for tag in tags {
        bar.inc(1);
        let Some(name) = namer.downstream_name(&tag.name) else {
            debug!("ignoring tag {} without a leading v", tag.name);
            continue;
        };
        if downstream.has_tag(&name)? {
            report.outcomes.push(TagOutcome::Exists { downstream: name });
            continue;
        }

        let commit = match resolve_tag_target(correlation, tag.target) {
            Ok(commit) => commit,
            Err(e) if e.is_recoverable() => {
                warn!("skipping tag {}: {}", tag.name, e);
                report.outcomes.push(TagOutcome::Skipped {
                    upstream: tag.name,
                    reason: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        if !dry_run {
            let tagger = tag.tagger.clone().unwrap_or_else(fallback_tagger);
            downstream.create_tag(&name, commit, &tagger, &tag.message)?;
        }
        let verb = if dry_run { "would tag" } else { "tagged" };
        info!("{} {} as {} at {}{}", verb, tag.name, name, commit, tagged_at(&tag));
        report.outcomes.push(TagOutcome::Created {
            upstream: tag.name,
            downstream: name,
            commit,
        });
    }
    bar.finish_and_clear();

    Ok(report)
}

/// Pin commits of a dependency repository for the given upstream tag names.
///
/// Unknown tags and correlation gaps are reported per tag.
pub fn pin_commits<U>(
    upstream: &U,
    correlation: &Correlation,
    tag_names: &[String],
) -> Result<Vec<(String, Result<Oid>)>>
where
    U: TagStore + ?Sized,
{
    let tags = upstream.annotated_tags()?;
    Ok(tag_names
        .iter()
        .map(|name| {
            let pin = tags
                .iter()
                .find(|t| &t.name == name)
                .ok_or_else(|| Error::TagNotFound { name: name.clone() })
                .and_then(|t| resolve_pin_commit(correlation, t.target));
            (name.clone(), pin)
        })
        .collect())
}

// Tag objects without a tagger line are legal.
fn fallback_tagger() -> Tagger {
    Tagger {
        name: "sync-tags".to_string(),
        email: "sync-tags@localhost".to_string(),
        time: Utc::now().timestamp(),
        offset_minutes: 0,
    }
}

fn tagged_at(tag: &AnnotatedTag) -> String {
    tag.tagger
        .as_ref()
        .and_then(|t| Utc.timestamp_opt(t.time, 0).single())
        .map(|time| format!(" (tagged {})", time.to_rfc2822()))
        .unwrap_or_default()
}
