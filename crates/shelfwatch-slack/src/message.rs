//! Digest formatting: one mrkdwn line per order, packed greedily into
//! blocks that fit Slack's section limit.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use shelfwatch_core::types::OrderRecord;

/// Header on the first block of a non-empty digest.
pub const DIGEST_HEADER: &str =
    "*Unfulfilled orders > 24hrs (within last 30 days) - please review*";

/// Single block posted when the window holds no orders.
pub const NO_ORDERS_TEXT: &str =
    ":white_check_mark: No unfulfilled orders in the 30d->24h window.";

/// One unit of text sized for a single `chat.postMessage` call.
/// Block identity is positional only; the digest is the ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBlock {
    pub header: String,
    /// Bullet lines joined by newlines. Empty for the no-orders block.
    pub body: String,
}

/// Render one order as a single mrkdwn bullet line.
pub fn render_line(order: &OrderRecord, tz: &Tz) -> String {
    let when = format_local(&order.created_at, tz);
    let total = if order.total_amount.is_empty() {
        String::new()
    } else {
        format!(" - {} {}", order.total_amount, order.currency)
    };
    format!(
        "\u{2022} <{}|{}> - {}{} - Financial: `{}` - Fulfillment: `{}`",
        order.admin_url, order.name, when, total, order.financial_status, order.fulfillment_status
    )
}

fn format_local(ts: &DateTime<Utc>, tz: &Tz) -> String {
    ts.with_timezone(tz).format("%b %d, %Y %I:%M %p %Z").to_string()
}

/// Pack lines greedily in input order. A chunk is flushed when the next line
/// (plus its joining newline) would push it past `max_chars`. A single line
/// longer than `max_chars` is emitted as its own oversized chunk rather than
/// truncated; Slack renders long sections poorly but losing order ids from a
/// review digest is worse.
pub fn chunk_lines(lines: &[String], max_chars: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for line in lines {
        let add_len = line.len() + 1;
        if current_len + add_len > max_chars && !current.is_empty() {
            parts.push(current.join("\n"));
            current = vec![line.as_str()];
            current_len = add_len;
        } else {
            current.push(line.as_str());
            current_len += add_len;
        }
    }
    if !current.is_empty() {
        parts.push(current.join("\n"));
    }
    parts
}

/// Build the ordered digest for an invocation. Empty input yields exactly one
/// sentinel block; otherwise each chunk becomes a block, continuation blocks
/// carrying a numbered header suffix.
pub fn build_digest(orders: &[OrderRecord], tz: &Tz, max_chars: usize) -> Vec<MessageBlock> {
    if orders.is_empty() {
        return vec![MessageBlock {
            header: NO_ORDERS_TEXT.to_string(),
            body: String::new(),
        }];
    }

    let lines: Vec<String> = orders.iter().map(|o| render_line(o, tz)).collect();
    chunk_lines(&lines, max_chars)
        .into_iter()
        .enumerate()
        .map(|(idx, body)| MessageBlock {
            header: if idx == 0 {
                DIGEST_HEADER.to_string()
            } else {
                format!("{DIGEST_HEADER} (cont. {idx})")
            },
            body,
        })
        .collect()
}
