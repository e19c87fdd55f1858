//! # Shelfwatch Core
//! Shared configuration, error, and domain types for the shelfwatch pipeline.

pub mod config;
pub mod error;
pub mod types;

pub use config::ShelfwatchConfig;
pub use error::{Result, ShelfwatchError};
pub use types::{FinancialStatus, FulfillmentStatus, OrderPage, OrderRecord};
