// src/source_hash.rs

//! Recovers the upstream commit a downstream commit was transplanted from.
//!
//! The filtering process records the origin in the commit message, either as
//! a trailer line `Kubernetes-commit: <sha>` or, in older history, as a
//! synthetic first line `sync(kubernetes/kubernetes)<sha>`.

use crate::model::Commit;
use git2::Oid;

/// What a downstream commit message says about its upstream origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceHash {
    Found(Oid),
    /// No trailer and no legacy prefix, e.g. a downstream-only fixup commit
    Absent,
    /// A trailer or prefix is present but the hash after it does not parse
    Malformed { text: String },
}

impl SourceHash {
    pub fn oid(&self) -> Option<Oid> {
        match self {
            SourceHash::Found(oid) => Some(*oid),
            _ => None,
        }
    }
}

/// Matching rules for one source repository
#[derive(Debug, Clone)]
pub struct TrailerParser {
    trailer_prefix: String,
    legacy_prefix: String,
}

impl TrailerParser {
    /// Rules for `org/repo`, with the trailer key derived from the repo name.
    pub fn new(org: &str, repo: &str) -> Self {
        TrailerParser {
            trailer_prefix: trailer_key(repo),
            legacy_prefix: format!("sync({}/{})", org, repo),
        }
    }

    /// Uses `tag` instead of the repo name for the trailer key.
    pub fn with_commit_message_tag(mut self, tag: &str) -> Self {
        self.trailer_prefix = trailer_key(tag);
        self
    }

    pub fn trailer_prefix(&self) -> &str {
        &self.trailer_prefix
    }

    pub fn source_hash(&self, commit: &Commit) -> SourceHash {
        self.parse_message(&commit.message)
    }

    pub fn parse_message(&self, message: &str) -> SourceHash {
        for line in message.lines() {
            if let Some(rest) = line.strip_prefix(&self.trailer_prefix) {
                return parse_hash(rest);
            }
        }

        match message.lines().next().and_then(|first| first.strip_prefix(&self.legacy_prefix)) {
            Some(rest) => parse_hash(rest),
            None => SourceHash::Absent,
        }
    }
}

fn trailer_key(name: &str) -> String {
    format!("{}-commit: ", title(name))
}

/// Upper-cases the first character, leaves the rest alone.
fn title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_hash(text: &str) -> SourceHash {
    let text = text.trim();
    let well_formed = text.len() == 40 && text.bytes().all(|b| b.is_ascii_hexdigit());
    if !well_formed {
        return SourceHash::Malformed { text: text.to_string() };
    }
    match Oid::from_str(text) {
        Ok(oid) if oid.is_zero() => SourceHash::Absent,
        Ok(oid) => SourceHash::Found(oid),
        Err(_) => SourceHash::Malformed { text: text.to_string() },
    }
}
