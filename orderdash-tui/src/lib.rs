//! orderdash TUI - live terminal view over a matching engine's CSV output
//!
//! Panels:
//! 1. Market Summary - last price, volume, price trend
//! 2. Market Depth - bid and ask quantity per price
//! 3. Active Orders - resting buy and sell orders
//! 4. Order Status - lifecycle distribution
//! 5. Trade Log - traded quantity per price and trade history
//! 6. Help - keyboard shortcuts

pub mod app;
pub mod input;
pub mod logging;
pub mod persistence;
pub mod poller;
pub mod theme;
pub mod ui;

pub use app::{AppState, Panel};
pub use input::handle_key;

#[cfg(test)]
mod test_helpers;
