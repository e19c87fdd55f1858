//! Review window resolution and Shopify search-term rendering.

use chrono::{DateTime, Duration, Utc};

/// Creation-time window for the digest: orders created between
/// `now - lookback_days` and `now - grace_hours`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderWindow {
    pub lower: DateTime<Utc>,
    pub upper: DateTime<Utc>,
}

impl OrderWindow {
    pub fn ending_before(now: DateTime<Utc>, lookback_days: i64, grace_hours: i64) -> Self {
        Self {
            lower: now - Duration::days(lookback_days),
            upper: now - Duration::hours(grace_hours),
        }
    }

    /// Render the Shopify order search term. The negated financial_status
    /// clause excludes orders still awaiting payment; the window bounds use
    /// second-precision RFC 3339 with a literal Z, which is what the order
    /// search syntax accepts.
    pub fn search_term(&self) -> String {
        format!(
            "fulfillment_status:unfulfilled AND status:open \
             AND -financial_status:pending \
             AND created_at:>={} AND created_at:<{}",
            self.lower.format("%Y-%m-%dT%H:%M:%SZ"),
            self.upper.format("%Y-%m-%dT%H:%M:%SZ"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_bounds() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let w = OrderWindow::ending_before(now, 30, 24);
        assert_eq!(w.lower, Utc.with_ymd_and_hms(2026, 2, 8, 12, 0, 0).unwrap());
        assert_eq!(w.upper, Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_search_term_format() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let term = OrderWindow::ending_before(now, 30, 24).search_term();
        assert_eq!(
            term,
            "fulfillment_status:unfulfilled AND status:open \
             AND -financial_status:pending \
             AND created_at:>=2026-02-08T12:00:00Z AND created_at:<2026-03-09T12:00:00Z"
        );
    }
}
