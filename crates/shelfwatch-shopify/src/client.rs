//! Shopify Admin GraphQL client with cursor pagination.

use serde::Deserialize;
use shelfwatch_core::config::ShopifyConfig;
use shelfwatch_core::error::{Result, ShelfwatchError};
use shelfwatch_core::types::{FinancialStatus, FulfillmentStatus, OrderPage, OrderRecord};

use crate::query::OrderWindow;

/// GraphQL document for one page of the unfulfilled-order window.
const ORDERS_QUERY: &str = r#"
query UnfulfilledWindow($q: String!, $first: Int = 50, $after: String) {
  orders(first: $first, after: $after, query: $q, sortKey: CREATED_AT, reverse: true) {
    pageInfo { hasNextPage endCursor }
    edges {
      node {
        id
        legacyResourceId
        name
        createdAt
        displayFulfillmentStatus
        displayFinancialStatus
        currentTotalPriceSet { shopMoney { amount currencyCode } }
      }
    }
  }
}
"#;

const PAGE_SIZE: u32 = 100;

/// Hard cap on pages per invocation. The upstream contract says
/// hasNextPage eventually goes false; this keeps a misbehaving API from
/// turning the pagination loop into an infinite one.
const MAX_PAGES: u32 = 50;

/// Paginated query client for the Shopify Admin GraphQL API.
pub struct ShopifyClient {
    endpoint: String,
    token: String,
    shop: String,
    store_handle: Option<String>,
    http: reqwest::Client,
}

impl ShopifyClient {
    pub fn new(config: &ShopifyConfig) -> Result<Self> {
        let endpoint = format!(
            "https://{}/admin/api/{}/graphql.json",
            config.shop, config.api_version
        );
        Ok(Self {
            endpoint,
            token: config.admin_token.clone(),
            shop: config.shop.clone(),
            store_handle: config.store_handle.clone(),
            http: Self::build_http()?,
        })
    }

    /// Client pointed at an arbitrary endpoint. Tests aim this at a mock
    /// server; production code goes through [`ShopifyClient::new`].
    pub fn with_endpoint(endpoint: &str, config: &ShopifyConfig) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            token: config.admin_token.clone(),
            shop: config.shop.clone(),
            store_handle: config.store_handle.clone(),
            http: Self::build_http()?,
        })
    }

    fn build_http() -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent("shelfwatch/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ShelfwatchError::Shopify(format!("HTTP client error: {e}")))
    }

    /// Fetch every order in the window, following cursors until the API
    /// reports no further pages. Records keep page/edge order.
    pub async fn fetch_all(&self, window: &OrderWindow) -> Result<Vec<OrderRecord>> {
        let search = window.search_term();
        tracing::debug!("Shopify search term: {search}");

        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        for page_no in 1..=MAX_PAGES {
            let page = self.fetch_page(&search, cursor.as_deref()).await?;
            tracing::debug!("Page {page_no}: {} order(s)", page.records.len());
            records.extend(page.records);

            if !page.has_next_page {
                return Ok(records);
            }
            match page.end_cursor {
                None => {
                    return Err(ShelfwatchError::Shopify(
                        "Pagination reported more pages but no cursor".into(),
                    ));
                }
                Some(next) if Some(&next) == cursor.as_ref() => {
                    return Err(ShelfwatchError::Shopify(format!(
                        "Pagination cursor did not advance (stuck at {next:?})"
                    )));
                }
                Some(next) => cursor = Some(next),
            }
        }

        Err(ShelfwatchError::Shopify(format!(
            "Gave up after {MAX_PAGES} pages; upstream keeps reporting more"
        )))
    }

    /// Fetch a single page of results for the given search term.
    pub async fn fetch_page(&self, search: &str, after: Option<&str>) -> Result<OrderPage> {
        let payload = serde_json::json!({
            "query": ORDERS_QUERY,
            "variables": { "q": search, "first": PAGE_SIZE, "after": after },
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", &self.token)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ShelfwatchError::Shopify(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ShelfwatchError::Shopify(format!(
                "API error {status}: {body}"
            )));
        }

        let body: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| ShelfwatchError::Shopify(format!("Invalid response: {e}")))?;

        if let Some(errors) = body.errors {
            return Err(ShelfwatchError::Shopify(format!(
                "GraphQL errors: {errors}"
            )));
        }
        let orders = body
            .data
            .ok_or_else(|| ShelfwatchError::Shopify("Response missing data".into()))?
            .orders;

        let records = orders
            .edges
            .into_iter()
            .map(|edge| self.to_record(edge.node))
            .collect();

        Ok(OrderPage {
            records,
            end_cursor: orders.page_info.end_cursor,
            has_next_page: orders.page_info.has_next_page,
        })
    }

    fn to_record(&self, node: OrderNode) -> OrderRecord {
        let admin_url = self.order_url(&node.legacy_resource_id);
        let (total_amount, currency) = node
            .current_total_price_set
            .map(|set| (set.shop_money.amount, set.shop_money.currency_code))
            .unwrap_or_default();
        OrderRecord {
            gid: node.id,
            legacy_id: node.legacy_resource_id,
            name: node.name,
            created_at: node.created_at,
            financial_status: node.display_financial_status,
            fulfillment_status: node.display_fulfillment_status,
            total_amount,
            currency,
            admin_url,
        }
    }

    /// Admin-console link for an order. The admin.shopify.com form needs the
    /// store handle; without one the legacy per-shop URL still redirects.
    fn order_url(&self, legacy_id: &str) -> String {
        match &self.store_handle {
            Some(handle) => format!("https://admin.shopify.com/store/{handle}/orders/{legacy_id}"),
            None => format!("https://{}/admin/orders/{legacy_id}", self.shop),
        }
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<OrdersData>,
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OrdersData {
    orders: OrdersConnection,
}

#[derive(Debug, Deserialize)]
struct OrdersConnection {
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
    edges: Vec<OrderEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderEdge {
    node: OrderNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderNode {
    id: String,
    legacy_resource_id: String,
    name: String,
    created_at: chrono::DateTime<chrono::Utc>,
    display_fulfillment_status: FulfillmentStatus,
    display_financial_status: FinancialStatus,
    current_total_price_set: Option<MoneyBag>,
}

#[derive(Debug, Deserialize)]
struct MoneyBag {
    #[serde(rename = "shopMoney")]
    shop_money: ShopMoney,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShopMoney {
    amount: String,
    currency_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(store_handle: Option<&str>) -> ShopifyConfig {
        ShopifyConfig {
            shop: "demo.myshopify.com".into(),
            admin_token: "shpat_test".into(),
            api_version: "2025-10".into(),
            store_handle: store_handle.map(String::from),
        }
    }

    fn order_node(n: u32) -> serde_json::Value {
        serde_json::json!({
            "id": format!("gid://shopify/Order/{n}"),
            "legacyResourceId": n.to_string(),
            "name": format!("#10{n}"),
            "createdAt": "2026-03-01T15:30:00Z",
            "displayFulfillmentStatus": "UNFULFILLED",
            "displayFinancialStatus": "PAID",
            "currentTotalPriceSet": { "shopMoney": { "amount": "49.95", "currencyCode": "USD" } },
        })
    }

    fn page_body(nodes: &[serde_json::Value], cursor: Option<&str>, has_next: bool) -> serde_json::Value {
        let edges: Vec<_> = nodes.iter().map(|n| serde_json::json!({ "node": n })).collect();
        serde_json::json!({
            "data": {
                "orders": {
                    "pageInfo": { "hasNextPage": has_next, "endCursor": cursor },
                    "edges": edges,
                }
            }
        })
    }

    fn window() -> OrderWindow {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        OrderWindow::ending_before(now, 30, 24)
    }

    #[tokio::test]
    async fn test_fetch_all_follows_cursors_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql.json"))
            .and(header("X-Shopify-Access-Token", "shpat_test"))
            .and(body_partial_json(serde_json::json!({ "variables": { "after": null } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
                &[order_node(1), order_node(2)],
                Some("cursor-1"),
                true,
            )))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/graphql.json"))
            .and(body_partial_json(serde_json::json!({ "variables": { "after": "cursor-1" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
                &[order_node(3)],
                Some("cursor-2"),
                false,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = format!("{}/graphql.json", server.uri());
        let client = ShopifyClient::with_endpoint(&endpoint, &test_config(None)).unwrap();
        let records = client.fetch_all(&window()).await.unwrap();

        assert_eq!(records.len(), 3);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["#101", "#102", "#103"]);
        assert_eq!(records[0].total_amount, "49.95");
        assert_eq!(records[0].currency, "USD");
        assert_eq!(
            records[0].admin_url,
            "https://demo.myshopify.com/admin/orders/1"
        );
    }

    #[tokio::test]
    async fn test_store_handle_changes_admin_link() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
                &[order_node(7)],
                None,
                false,
            )))
            .mount(&server)
            .await;

        let client =
            ShopifyClient::with_endpoint(&server.uri(), &test_config(Some("demo"))).unwrap();
        let records = client.fetch_all(&window()).await.unwrap();
        assert_eq!(
            records[0].admin_url,
            "https://admin.shopify.com/store/demo/orders/7"
        );
    }

    #[tokio::test]
    async fn test_graphql_errors_are_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [{ "message": "Throttled" }]
            })))
            .mount(&server)
            .await;

        let client = ShopifyClient::with_endpoint(&server.uri(), &test_config(None)).unwrap();
        let err = client.fetch_all(&window()).await.unwrap_err();
        assert!(err.to_string().contains("GraphQL errors"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let client = ShopifyClient::with_endpoint(&server.uri(), &test_config(None)).unwrap();
        let err = client.fetch_all(&window()).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_stuck_cursor_aborts_instead_of_looping() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
                &[order_node(1)],
                Some("same"),
                true,
            )))
            .mount(&server)
            .await;

        let client = ShopifyClient::with_endpoint(&server.uri(), &test_config(None)).unwrap();
        let err = client.fetch_all(&window()).await.unwrap_err();
        assert!(err.to_string().contains("did not advance"));
    }
}
