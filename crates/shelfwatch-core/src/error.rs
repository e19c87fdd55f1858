//! Shelfwatch error types.

use thiserror::Error;

/// Result alias used across all shelfwatch crates.
pub type Result<T> = std::result::Result<T, ShelfwatchError>;

/// Top-level error for the notifier pipeline.
///
/// `Config` and `Shopify` abort the whole invocation; `Slack` covers a single
/// failed message post and is handled best-effort by the poster.
#[derive(Error, Debug)]
pub enum ShelfwatchError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Shopify error: {0}")]
    Shopify(String),

    #[error("Slack error: {0}")]
    Slack(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
