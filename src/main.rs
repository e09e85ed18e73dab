mod cli;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use cli::{Cli, Command, CrackArgs};
use hashcrack::config::CrackerConfig;
use hashcrack::dispatcher::Dispatcher;
use hashcrack::hashing::{self, HashType};
use hashcrack::publisher::BroadcastPublisher;
use hashcrack::store::MemoryStore;
use hashcrack::strength::analyze_strength;
use hashcrack::wordlist::DirectoryWordlists;
use ui::JobProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        command,
        config,
        workers,
        max_attempts,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    match command {
        Command::Crack(args) => {
            let config = CrackerConfig::load(config.as_deref())?.with_overrides(workers, max_attempts);
            debug!(?config, "Loaded configuration");
            crack(config, args).await?;
        }
        Command::Detect { hash } => {
            let detection = hashing::detect(&hash);
            let info = hashing::hash_info(detection.hash_type);
            ui::print_detection(&detection, &info);
        }
        Command::Hash { password } => {
            ui::print_hashes(&hashing::generate_all(&password));
        }
        Command::Verify {
            password,
            hash,
            hash_type,
        } => {
            let hash_type: HashType = hash_type.parse()?;
            ui::print_verification(hashing::verify(&password, &hash, hash_type));
        }
        Command::Strength { password, json } => {
            let report = analyze_strength(&password);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                ui::print_strength(&report);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "hashcrack=debug" } else { "hashcrack=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn crack(config: CrackerConfig, args: CrackArgs) -> Result<()> {
    let spec = args.to_request().validate(config.max_bruteforce_length)?;

    let publisher = Arc::new(BroadcastPublisher::new(config.channel_capacity));
    let dispatcher = Dispatcher::new(
        &config,
        Arc::new(MemoryStore::new()),
        publisher.clone(),
        Arc::new(DirectoryWordlists::new(config.wordlist_dir.clone())),
    );

    // Subscribe before submitting so the first RUNNING snapshot is not missed.
    let job_id = Uuid::new_v4().to_string();
    let mut events = publisher.subscribe(&job_id);
    let job = match dispatcher.submit_with_id(job_id.clone(), spec) {
        Ok(job) => job,
        Err(e) => {
            publisher.close(&job_id);
            return Err(e.into());
        }
    };
    let progress = (!args.json).then(|| JobProgress::start(&job));

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if let Some(progress) = &progress {
                        progress.update(&event.job);
                    }
                    if event.job.status.is_terminal() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Progress display fell behind"),
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                if let Err(e) = dispatcher.cancel(&job_id) {
                    warn!(job_id = %job_id, error = %e, "Could not cancel job");
                }
            }
        }
    }

    let job = dispatcher.wait(&job_id).await?;
    match progress {
        Some(progress) => progress.complete(&job),
        None => ui::print_job_json(&job),
    }
    Ok(())
}
