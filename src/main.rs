//! fsfuzz - Blind Filesystem Fuzzer
//!
//! Entry point. No flags: fuzzes everything under `/` with the defaults in
//! [`FuzzConfig`]. Log verbosity follows `RUST_LOG`.

use anyhow::{Context, Result};
use fsfuzz::config::FuzzConfig;
use fsfuzz::daemon;
use fsfuzz::progress::{format_number, print_header, print_listing, ProgressReporter};
use fsfuzz::walker::Enumerator;
use fsfuzz::FuzzPool;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    setup_logging();

    let mut config = FuzzConfig::default();
    config.validate().context("Invalid configuration")?;

    // Pin the seed so the header and the pool agree on it
    config.seed = Some(config.resolve_seed());

    if config.daemonize {
        daemon::detach(config.daemon_settle)?;
    }

    info!("Starting...");
    print_header(
        &config.root,
        config.worker_count,
        config.buffer_capacity,
        config.fill_byte,
        config.resolve_seed(),
    );

    let reporter = ProgressReporter::new();
    reporter.set_status("Enumerating...");
    let listing = Enumerator::new(&config.root)
        .on_progress(|p| reporter.update(p))
        .run();
    reporter.finish_and_clear();

    info!(files = listing.targets.len(), "Created listing of {} files", listing.targets.len());

    let stats = listing.stats;
    let duration = listing.duration;
    let targets = Arc::new(listing.targets.freeze()?);
    print_listing(&targets, &stats, duration);

    let pool = FuzzPool::start(Arc::clone(&targets), &config)
        .context("Failed to start fuzz workers")?;
    info!(seed = pool.base_seed(), "Fuzzing (replay with this seed)");

    // Workers never return; this reports until the process is killed
    while !pool.is_finished() {
        thread::sleep(config.status_interval);

        let progress = pool.progress();
        info!(
            iterations = %format_number(progress.iterations),
            reads = %format_number(progress.reads_opened),
            writes = %format_number(progress.writes_opened),
            excluded = %format_number(progress.excluded),
            rate = %format!("{:.0}/s", progress.iterations_per_second()),
            "Fuzzing"
        );
    }

    pool.join().context("Fuzz worker failed")?;
    info!("All threads completed");

    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fsfuzz=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
