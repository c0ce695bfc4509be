//! Orderdash Core — the data side of the order book dashboard.
//!
//! The matching engine writes four CSV files (trades, resting buy orders,
//! resting sell orders, order status). This crate reads them and turns them
//! into the aggregates the dashboard shows:
//! - Row schemas matching the engine's headers
//! - Tolerant CSV loading (bad rows skipped and reported, missing files empty)
//! - Change detection by content fingerprint and snapshot assembly
//! - Group-by/sum aggregations: ticker, summary, depth, status distribution
//! - TOML configuration, demo data generation, summary export

pub mod aggregate;
pub mod config;
pub mod error;
pub mod feed;
pub mod loader;
pub mod report;
pub mod sample;
pub mod schema;

pub use aggregate::{DashboardView, PriceAxis};
pub use config::DashboardConfig;
pub use error::{ConfigError, DataError};
pub use feed::{DashboardSnapshot, DataSet, DataSources, FeedState, LoadIssue, PollOutcome};
pub use schema::{OrderRow, OrderStatus, Side, StatusRow, TradeRow};
