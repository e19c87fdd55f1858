//! # Shelfwatch Shopify
//! Order Query Client: paginated Shopify Admin GraphQL queries for
//! unfulfilled orders inside a review window.

pub mod client;
pub mod query;

pub use client::ShopifyClient;
pub use query::OrderWindow;
