//! # Shelfwatch
//!
//! Scheduled notifier: queries Shopify for open, unfulfilled, non-pending
//! orders older than 24 hours (within the last 30 days) and posts a digest
//! to a Slack channel. Designed to be run once per slot by an external
//! scheduler (cron, EventBridge, systemd timer).
//!
//! Usage:
//!   shelfwatch                         # run once with env / default config
//!   shelfwatch --config ./watch.toml   # explicit config file
//!   shelfwatch --dry-run               # print the digest, post nothing

mod orchestrator;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use shelfwatch_core::ShelfwatchConfig;

#[derive(Parser)]
#[command(
    name = "shelfwatch",
    version,
    about = "Shopify unfulfilled-order digest for Slack"
)]
struct Cli {
    /// Config file path (default: ~/.shelfwatch/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the digest instead of posting to Slack
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "shelfwatch=debug,shelfwatch_shopify=debug,shelfwatch_slack=debug"
    } else {
        "shelfwatch=info,shelfwatch_shopify=info,shelfwatch_slack=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => {
            let mut config = ShelfwatchConfig::load_from(path)?;
            config.apply_env();
            config
        }
        None => ShelfwatchConfig::load()?,
    };
    config.validate()?;

    let summary = orchestrator::run(&config, cli.dry_run).await?;

    println!(
        "Posted {} Slack message(s) with {} order(s).",
        summary.posted, summary.orders
    );
    if summary.failed > 0 {
        anyhow::bail!("{} message block(s) failed to post", summary.failed);
    }
    Ok(())
}
