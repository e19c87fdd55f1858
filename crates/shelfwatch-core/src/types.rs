//! Domain types shared across the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One unfulfilled order pulled from Shopify. Immutable once fetched;
/// lives only for the duration of a single invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    /// GraphQL global id (gid://shopify/Order/...).
    pub gid: String,
    /// Numeric legacy id, used to build admin links.
    pub legacy_id: String,
    /// Human-readable order number, e.g. "#1042".
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub financial_status: FinancialStatus,
    pub fulfillment_status: FulfillmentStatus,
    /// Order total as the decimal string Shopify returns.
    pub total_amount: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Direct admin-console URL for the order.
    pub admin_url: String,
}

/// One page of paginated query results plus its continuation cursor.
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub records: Vec<OrderRecord>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// Payment state, matching Shopify's displayFinancialStatus wire strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinancialStatus {
    Authorized,
    Paid,
    PartiallyPaid,
    PartiallyRefunded,
    Pending,
    Refunded,
    Voided,
    Expired,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for FinancialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Authorized => "AUTHORIZED",
            Self::Paid => "PAID",
            Self::PartiallyPaid => "PARTIALLY_PAID",
            Self::PartiallyRefunded => "PARTIALLY_REFUNDED",
            Self::Pending => "PENDING",
            Self::Refunded => "REFUNDED",
            Self::Voided => "VOIDED",
            Self::Expired => "EXPIRED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Shipping state, matching Shopify's displayFulfillmentStatus wire strings.
/// The query filter restricts results to the unfulfilled subset, but the
/// display status can still be PARTIALLY_FULFILLED or SCHEDULED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    Unfulfilled,
    PartiallyFulfilled,
    Fulfilled,
    Scheduled,
    OnHold,
    InProgress,
    PendingFulfillment,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unfulfilled => "UNFULFILLED",
            Self::PartiallyFulfilled => "PARTIALLY_FULFILLED",
            Self::Fulfilled => "FULFILLED",
            Self::Scheduled => "SCHEDULED",
            Self::OnHold => "ON_HOLD",
            Self::InProgress => "IN_PROGRESS",
            Self::PendingFulfillment => "PENDING_FULFILLMENT",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}
