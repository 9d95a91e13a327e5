// src/cli.rs

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recreate upstream release tags on the matching downstream commits
    SyncTags(SyncTagsArgs),
    /// Print the downstream commit to pin a dependency to for upstream tags
    Pin(PinArgs),
    /// Dump the upstream -> downstream commit mapping
    Mapping(MappingArgs),
}

/// Which two histories to correlate, and how downstream commits name their origin
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Path to the upstream (monorepo) repository
    #[arg(long)]
    pub upstream: PathBuf,

    /// Remote of the upstream repository to read the source branch from
    #[arg(long)]
    pub source_remote: Option<String>,

    /// Upstream branch whose mainline is correlated
    #[arg(long, default_value = "master")]
    pub source_branch: String,

    /// Path to the downstream repository
    #[arg(long, default_value = ".")]
    pub downstream: PathBuf,

    /// Downstream branch to correlate, HEAD if not given
    #[arg(long)]
    pub dest_branch: Option<String>,

    /// Organisation of the upstream repository, for legacy sync(org/repo) subjects
    #[arg(long, default_value = "kubernetes")]
    pub source_org: String,

    /// Name of the upstream repository
    #[arg(long, default_value = "kubernetes")]
    pub source_repo: String,

    /// Key of the commit message trailer naming the upstream commit,
    /// e.g. "Kubernetes" for Kubernetes-commit
    #[arg(long)]
    pub commit_message_tag: Option<String>,
}

impl HistoryArgs {
    pub fn source_ref(&self) -> String {
        match &self.source_remote {
            Some(remote) => format!("refs/remotes/{}/{}", remote, self.source_branch),
            None => format!("refs/heads/{}", self.source_branch),
        }
    }

    pub fn dest_ref(&self) -> String {
        match &self.dest_branch {
            Some(branch) => format!("refs/heads/{}", branch),
            None => "HEAD".to_string(),
        }
    }
}

#[derive(Args, Debug)]
pub struct SyncTagsArgs {
    #[command(flatten)]
    pub history: HistoryArgs,

    /// Replaces the leading "v" of upstream tag names
    #[arg(long, default_value = sync_tags::tags::DEFAULT_TAG_PREFIX)]
    pub prefix: String,

    /// Write the full upstream -> downstream mapping to this file
    #[arg(long)]
    pub mapping_output_file: Option<PathBuf>,

    /// Report what would be tagged without creating tags
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct PinArgs {
    #[command(flatten)]
    pub history: HistoryArgs,

    /// Upstream tag to resolve, may be repeated
    #[arg(long = "tag", required = true)]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct MappingArgs {
    #[command(flatten)]
    pub history: HistoryArgs,

    /// Output file, stdout if not given
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
