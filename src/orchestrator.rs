//! One-shot pipeline: fetch the order window, build the digest, post it.

use std::time::Duration;

use shelfwatch_core::error::{Result, ShelfwatchError};
use shelfwatch_core::ShelfwatchConfig;
use shelfwatch_shopify::{OrderWindow, ShopifyClient};
use shelfwatch_slack::{build_digest, SlackClient};

/// What one invocation did, for logging and the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub orders: usize,
    pub posted: usize,
    pub failed: usize,
}

/// Run the whole pipeline once. `dry_run` prints the digest instead of
/// posting it.
pub async fn run(config: &ShelfwatchConfig, dry_run: bool) -> Result<RunSummary> {
    let shopify = ShopifyClient::new(&config.shopify)?;
    let slack = SlackClient::new(&config.slack)?;
    run_pipeline(config, &shopify, &slack, dry_run).await
}

/// Pipeline body with injectable clients, so tests can point both at mock
/// servers.
pub async fn run_pipeline(
    config: &ShelfwatchConfig,
    shopify: &ShopifyClient,
    slack: &SlackClient,
    dry_run: bool,
) -> Result<RunSummary> {
    let tz: chrono_tz::Tz = config
        .timezone
        .parse()
        .map_err(|_| ShelfwatchError::Config(format!("Unknown timezone: {}", config.timezone)))?;

    let window = OrderWindow::ending_before(
        chrono::Utc::now(),
        config.window.lookback_days,
        config.window.grace_hours,
    );
    tracing::info!(
        "Querying orders created {} .. {}",
        window.lower.format("%Y-%m-%dT%H:%M:%SZ"),
        window.upper.format("%Y-%m-%dT%H:%M:%SZ"),
    );

    let orders = shopify.fetch_all(&window).await?;
    tracing::info!("Found {} unfulfilled order(s) in the window", orders.len());

    let blocks = build_digest(&orders, &tz, config.slack.max_section_chars);

    if dry_run {
        for (idx, block) in blocks.iter().enumerate() {
            println!("--- block {} ---", idx + 1);
            println!("{}", block.header);
            if !block.body.is_empty() {
                println!("{}", block.body);
            }
        }
        return Ok(RunSummary {
            orders: orders.len(),
            posted: 0,
            failed: 0,
        });
    }

    let outcome = slack
        .post_digest(&blocks, Duration::from_millis(config.slack.post_delay_ms))
        .await;
    tracing::info!(
        "Posted {} Slack message(s) with {} order(s); {} failed",
        outcome.posted,
        orders.len(),
        outcome.failed,
    );

    Ok(RunSummary {
        orders: orders.len(),
        posted: outcome.posted,
        failed: outcome.failed,
    })
}
