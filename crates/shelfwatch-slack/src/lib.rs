//! # Shelfwatch Slack
//! Message Formatter and Notification Poster: renders order records into
//! size-bounded mrkdwn blocks and delivers them via `chat.postMessage`.

pub mod client;
pub mod message;

pub use client::{PostOutcome, SlackClient};
pub use message::{MessageBlock, build_digest};
