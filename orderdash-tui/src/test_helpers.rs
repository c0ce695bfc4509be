//! Test helpers for creating app state and mock data

use std::sync::mpsc::{self, Receiver};

use orderdash_core::sample::{generate, SampleSpec};
use orderdash_core::{DashboardConfig, DashboardSnapshot};

use crate::app::AppState;
use crate::poller::PollerCommand;

/// App wired to dead-end channels. Keep the receiver alive to observe the
/// commands the app sends to the poller.
pub fn test_app() -> (AppState, Receiver<PollerCommand>) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (_resp_tx, resp_rx) = mpsc::channel();
    let app = AppState::new(cmd_tx, resp_rx, &DashboardConfig::default());
    (app, cmd_rx)
}

pub fn sample_snapshot() -> DashboardSnapshot {
    let data = generate(&SampleSpec {
        trades: 30,
        resting_orders: 8,
        ..SampleSpec::default()
    });
    let mut snapshot = DashboardSnapshot::empty();
    snapshot.trades = data.trades;
    snapshot.buy_orders = data.buy_orders;
    snapshot.sell_orders = data.sell_orders;
    snapshot.statuses = data.statuses;
    snapshot
}
