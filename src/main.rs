// src/main.rs

mod cli;

use clap::Parser;
use cli::{Cli, Command, HistoryArgs, MappingArgs, PinArgs, SyncTagsArgs};
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;
use sync_tags::{
    correlate_histories, pin_commits, sync_tags, CommitCache, GitRepo, HistoryCorrelation, TagNamer,
    TagOutcome, TrailerParser,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let start_time = Instant::now();

    let result = match cli.command {
        Command::SyncTags(args) => run_sync_tags(&args),
        Command::Pin(args) => run_pin(&args),
        Command::Mapping(args) => run_mapping(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    info!("Total time: {:.2?}", start_time.elapsed());
}

/// Opened upstream and downstream repositories, sharing one commit cache
struct Repos {
    upstream: GitRepo,
    downstream: GitRepo,
}

fn open_repos(args: &HistoryArgs) -> sync_tags::Result<Repos> {
    let cache = CommitCache::new();
    Ok(Repos {
        upstream: GitRepo::open(&args.upstream, cache.clone())?,
        downstream: GitRepo::open(&args.downstream, cache)?,
    })
}

fn correlate_repos(repos: &Repos, args: &HistoryArgs) -> sync_tags::Result<HistoryCorrelation> {
    let mut parser = TrailerParser::new(&args.source_org, &args.source_repo);
    if let Some(tag) = &args.commit_message_tag {
        parser = parser.with_commit_message_tag(tag);
    }

    let upstream_tip = repos.upstream.resolve_commit(&args.source_ref())?;
    let downstream_tip = repos.downstream.try_resolve_commit(&args.dest_ref())?;

    let started = Instant::now();
    let history = correlate_histories(
        &repos.upstream,
        upstream_tip,
        &repos.downstream,
        downstream_tip,
        &parser,
    )?;
    info!(
        "Correlated {} upstream and {} downstream commits in {:.2?} ({} direct links)",
        history.upstream.len(),
        history.downstream.len(),
        started.elapsed(),
        history.correlation.direct_links()
    );
    Ok(history)
}

fn run_sync_tags(args: &SyncTagsArgs) -> sync_tags::Result<()> {
    let repos = open_repos(&args.history)?;
    let history = correlate_repos(&repos, &args.history)?;

    if let Some(path) = &args.mapping_output_file {
        println!("Writing upstream -> downstream mapping to {}", path.display());
        let mut out = BufWriter::new(File::create(path)?);
        history.correlation.write_mapping(&mut out, &history.upstream)?;
        out.flush()?;
    }

    let namer = TagNamer::new(args.prefix.clone());
    let report = sync_tags(
        &repos.upstream,
        &repos.downstream,
        &history.correlation,
        &namer,
        args.dry_run,
    )?;

    let verb = if args.dry_run { "Would create" } else { "Created" };
    println!(
        "{} {} tags, {} already present, {} skipped.",
        verb,
        report.created().count(),
        report.existing().count(),
        report.skipped().count()
    );
    for outcome in report.skipped() {
        if let TagOutcome::Skipped { upstream, reason } = outcome {
            println!("  skipped {}: {}", upstream, reason);
        }
    }
    Ok(())
}

fn run_pin(args: &PinArgs) -> sync_tags::Result<()> {
    let repos = open_repos(&args.history)?;
    let history = correlate_repos(&repos, &args.history)?;

    for (tag, pin) in pin_commits(&repos.upstream, &history.correlation, &args.tags)? {
        match pin {
            Ok(commit) => println!("{} {}", tag, commit),
            Err(e) if e.is_recoverable() => warn!("no pin commit for {}: {}", tag, e),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn run_mapping(args: &MappingArgs) -> sync_tags::Result<()> {
    let repos = open_repos(&args.history)?;
    let history = correlate_repos(&repos, &args.history)?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    history.correlation.write_mapping(&mut out, &history.upstream)?;
    out.flush()?;
    Ok(())
}
