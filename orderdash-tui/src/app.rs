//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. The poller thread communicates via channels.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use orderdash_core::config::{clamp_refresh_ms, DashboardConfig};
use orderdash_core::{DashboardSnapshot, DashboardView, DataSet, PriceAxis, Side};

use crate::poller::{PollerCommand, PollerResponse};

/// Poll intervals cycled with `+` / `-`, in milliseconds.
pub const INTERVAL_STEPS_MS: [u64; 9] = [100, 250, 500, 1_000, 2_000, 5_000, 10_000, 30_000, 60_000];

const ERROR_HISTORY_CAP: usize = 50;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Overview,
    Depth,
    Orders,
    Status,
    Trades,
    Help,
}

impl Panel {
    pub const COUNT: usize = 6;

    pub fn index(self) -> usize {
        match self {
            Panel::Overview => 0,
            Panel::Depth => 1,
            Panel::Orders => 2,
            Panel::Status => 3,
            Panel::Trades => 4,
            Panel::Help => 5,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Overview),
            1 => Some(Panel::Depth),
            2 => Some(Panel::Orders),
            3 => Some(Panel::Status),
            4 => Some(Panel::Trades),
            5 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Overview => "Market Summary",
            Panel::Depth => "Market Depth",
            Panel::Orders => "Active Orders",
            Panel::Status => "Order Status",
            Panel::Trades => "Trade Log",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Overview)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT).unwrap_or(Panel::Overview)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Poller,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Data => "DATA",
            ErrorCategory::Poller => "POLL",
            ErrorCategory::Other => "ERR",
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    ErrorHistory,
}

/// Poller bookkeeping shown in the status bar.
#[derive(Debug, Clone)]
pub struct PollState {
    pub interval: Duration,
    pub paused: bool,
    /// When the current view was loaded.
    pub last_update: Option<DateTime<Local>>,
    /// When the poller last looked at the files.
    pub last_checked: Option<DateTime<Local>>,
    /// Files that changed in the last update.
    pub changed: Vec<DataSet>,
    pub updates: u64,
}

/// Orders panel state — two tables, one focused.
#[derive(Debug, Clone, Copy)]
pub struct OrdersPanelState {
    pub focus: Side,
    pub buy_scroll: usize,
    pub sell_scroll: usize,
}

impl OrdersPanelState {
    pub fn scroll(&self, side: Side) -> usize {
        match side {
            Side::Buy => self.buy_scroll,
            Side::Sell => self.sell_scroll,
        }
    }

    fn scroll_mut(&mut self) -> &mut usize {
        match self.focus {
            Side::Buy => &mut self.buy_scroll,
            Side::Sell => &mut self.sell_scroll,
        }
    }
}

/// Display settings taken from the config file.
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub currency: String,
    pub max_rows: usize,
    pub depth_levels: usize,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Data
    pub view: DashboardView,
    pub display: DisplaySettings,
    pub price_axis: PriceAxis,
    /// `(file label, path)` pairs shown on the help panel.
    pub sources_display: Vec<(&'static str, String)>,

    // Panel states
    pub orders: OrdersPanelState,
    pub trades_scroll: usize,

    // Poller communication
    pub poll: PollState,
    pub poller_tx: Sender<PollerCommand>,
    pub poller_rx: Receiver<PollerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(
        poller_tx: Sender<PollerCommand>,
        poller_rx: Receiver<PollerResponse>,
        config: &DashboardConfig,
    ) -> Self {
        Self {
            active_panel: Panel::Overview,
            running: true,
            view: DashboardView::empty(),
            display: DisplaySettings {
                currency: config.currency.clone(),
                max_rows: config.ui.max_rows.max(1),
                depth_levels: config.ui.depth_levels.max(1),
            },
            price_axis: PriceAxis::default(),
            sources_display: {
                let sources = config.sources();
                DataSet::ALL
                    .iter()
                    .map(|&d| (d.label(), sources.path(d).display().to_string()))
                    .collect()
            },
            orders: OrdersPanelState {
                focus: Side::Buy,
                buy_scroll: 0,
                sell_scroll: 0,
            },
            trades_scroll: 0,
            poll: PollState {
                interval: config.refresh_interval(),
                paused: false,
                last_update: None,
                last_checked: None,
                changed: Vec::new(),
                updates: 0,
            },
            poller_tx,
            poller_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
        }
    }

    /// Drain every pending poller response without blocking.
    pub fn drain_poller(&mut self) {
        while let Ok(resp) = self.poller_rx.try_recv() {
            self.handle_poller_response(resp);
        }
    }

    pub fn handle_poller_response(&mut self, resp: PollerResponse) {
        match resp {
            PollerResponse::Snapshot { snapshot, changed } => {
                self.apply_snapshot(*snapshot, changed);
            }
            PollerResponse::Unchanged { checked_at } => {
                self.poll.last_checked = Some(checked_at);
            }
        }
    }

    /// Swap in a new view. Issues not present in the previous view are
    /// pushed to the error history so a persistent problem is reported once.
    pub fn apply_snapshot(&mut self, snapshot: DashboardSnapshot, changed: Vec<DataSet>) {
        let view = DashboardView::from_snapshot(&snapshot);

        let mut newest: Option<(String, bool)> = None;
        for issue in &view.issues {
            if self.view.issues.contains(issue) {
                continue;
            }
            let message = issue.to_string();
            tracing::warn!(dataset = %issue.dataset, "{message}");
            if !issue.is_warning() {
                self.record_error(ErrorCategory::Data, message.clone(), issue.dataset.to_string());
            }
            newest = Some((message, issue.is_warning()));
        }

        self.view = view;
        self.clamp_scrolls();
        self.poll.last_update = Some(snapshot.loaded_at);
        self.poll.last_checked = Some(snapshot.loaded_at);
        self.poll.changed = changed;
        self.poll.updates += 1;

        match newest {
            Some((message, true)) => self.set_warning(message),
            Some((message, false)) => self.status_message = Some((message, StatusLevel::Error)),
            None if self.poll.updates > 1 => {
                let files: Vec<&str> = self.poll.changed.iter().map(|d| d.label()).collect();
                if files.is_empty() {
                    // Only a forced reload arrives with nothing changed.
                    self.set_status("Refreshed: no changes");
                } else {
                    self.set_status(format!("Updated: {}", files.join(", ")));
                }
            }
            None => {}
        }
    }

    fn record_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: Local::now().naive_local(),
            category,
            message,
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        self.record_error(category, message.clone(), context);
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    fn send(&mut self, cmd: PollerCommand) {
        if self.poller_tx.send(cmd).is_err() {
            self.push_error(
                ErrorCategory::Poller,
                "Poller thread is not running".into(),
                "poller channel closed".into(),
            );
        }
    }

    pub fn request_refresh(&mut self) {
        self.send(PollerCommand::RefreshNow);
        self.set_status("Refreshing...");
    }

    pub fn toggle_pause(&mut self) {
        self.poll.paused = !self.poll.paused;
        if self.poll.paused {
            self.send(PollerCommand::Pause);
            self.set_warning("Polling paused (p to resume)");
        } else {
            self.send(PollerCommand::Resume);
            self.set_status("Polling resumed");
        }
    }

    /// Move to the next slower (`slower = true`) or faster poll interval.
    pub fn step_interval(&mut self, slower: bool) {
        let current = clamp_refresh_ms(self.poll.interval.as_millis() as u64);
        let next = if slower {
            INTERVAL_STEPS_MS
                .iter()
                .copied()
                .find(|&ms| ms > current)
                .unwrap_or(current)
        } else {
            INTERVAL_STEPS_MS
                .iter()
                .rev()
                .copied()
                .find(|&ms| ms < current)
                .unwrap_or(current)
        };
        if next != current {
            self.poll.interval = Duration::from_millis(next);
            self.send(PollerCommand::SetInterval(self.poll.interval));
        }
        self.set_status(format!("Refresh every {}", format_interval(self.poll.interval)));
    }

    pub fn toggle_price_axis(&mut self) {
        self.price_axis = self.price_axis.toggle();
        self.set_status(format!("Price chart x axis: {}", self.price_axis.label()));
    }

    pub fn toggle_orders_focus(&mut self) {
        self.orders.focus = match self.orders.focus {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        };
    }

    fn visible_len(&self, len: usize) -> usize {
        len.min(self.display.max_rows)
    }

    /// Scroll the table on the active panel by `delta` rows.
    pub fn scroll(&mut self, delta: isize) {
        match self.active_panel {
            Panel::Orders => {
                let len = self.visible_len(self.view.orders(self.orders.focus).len());
                let pos = self.orders.scroll_mut();
                *pos = step(*pos, delta, len);
            }
            Panel::Trades => {
                let len = self.visible_len(self.view.trades.len());
                self.trades_scroll = step(self.trades_scroll, delta, len);
            }
            _ => {}
        }
    }

    /// Jump to the newest row of the active table.
    pub fn scroll_to_top(&mut self) {
        match self.active_panel {
            Panel::Orders => *self.orders.scroll_mut() = 0,
            Panel::Trades => self.trades_scroll = 0,
            _ => {}
        }
    }

    fn clamp_scrolls(&mut self) {
        let buy_len = self.visible_len(self.view.buy_orders.len());
        let sell_len = self.visible_len(self.view.sell_orders.len());
        let trade_len = self.visible_len(self.view.trades.len());
        self.orders.buy_scroll = self.orders.buy_scroll.min(buy_len.saturating_sub(1));
        self.orders.sell_scroll = self.orders.sell_scroll.min(sell_len.saturating_sub(1));
        self.trades_scroll = self.trades_scroll.min(trade_len.saturating_sub(1));
    }
}

fn step(pos: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let moved = if delta < 0 {
        pos.saturating_sub(delta.unsigned_abs())
    } else {
        pos.saturating_add(delta as usize)
    };
    moved.min(len - 1)
}

pub fn format_interval(interval: Duration) -> String {
    let ms = interval.as_millis();
    if ms < 1_000 {
        format!("{ms}ms")
    } else if ms % 1_000 == 0 {
        format!("{}s", ms / 1_000)
    } else {
        format!("{:.1}s", ms as f64 / 1_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_snapshot, test_app};
    use orderdash_core::feed::{IssueKind, LoadIssue};

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Overview.next(), Panel::Depth);
        assert_eq!(Panel::Help.next(), Panel::Overview);
        assert_eq!(Panel::Overview.prev(), Panel::Help);
        assert_eq!(Panel::Depth.prev(), Panel::Overview);
    }

    #[test]
    fn panel_from_index() {
        for i in 0..Panel::COUNT {
            let p = Panel::from_index(i).unwrap();
            assert_eq!(p.index(), i);
        }
        assert!(Panel::from_index(Panel::COUNT).is_none());
    }

    #[test]
    fn error_history_caps_at_50() {
        let (mut app, _rx) = test_app();
        for i in 0..60 {
            app.push_error(ErrorCategory::Other, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
    }

    #[test]
    fn snapshot_replaces_view() {
        let (mut app, _rx) = test_app();
        app.apply_snapshot(sample_snapshot(), DataSet::ALL.to_vec());
        assert!(app.view.ticker.is_some());
        assert_eq!(app.poll.updates, 1);
        assert!(app.poll.last_update.is_some());
    }

    #[test]
    fn repeated_issue_is_reported_once() {
        let (mut app, _rx) = test_app();
        let mut snap = sample_snapshot();
        snap.issues = vec![LoadIssue {
            dataset: DataSet::Trades,
            kind: IssueKind::Rejected("trades: missing required column 'Price'".into()),
        }];
        app.apply_snapshot(snap.clone(), vec![DataSet::Trades]);
        app.apply_snapshot(snap, vec![DataSet::Trades]);
        assert_eq!(app.error_history.len(), 1);
    }

    #[test]
    fn missing_files_only_warn() {
        let (mut app, _rx) = test_app();
        let mut snap = DashboardSnapshot::empty();
        snap.issues = vec![LoadIssue {
            dataset: DataSet::OrderStatus,
            kind: IssueKind::Missing,
        }];
        app.apply_snapshot(snap, DataSet::ALL.to_vec());
        assert!(app.error_history.is_empty());
        assert_eq!(
            app.status_message.as_ref().map(|(_, l)| *l),
            Some(StatusLevel::Warning)
        );
    }

    #[test]
    fn forced_refresh_without_changes_clears_pending_status() {
        let (mut app, _rx) = test_app();
        app.apply_snapshot(sample_snapshot(), DataSet::ALL.to_vec());
        app.request_refresh();
        assert_eq!(
            app.status_message.as_ref().map(|(m, _)| m.as_str()),
            Some("Refreshing...")
        );

        app.apply_snapshot(sample_snapshot(), Vec::new());
        assert_eq!(
            app.status_message,
            Some(("Refreshed: no changes".to_string(), StatusLevel::Info))
        );
    }

    #[test]
    fn changed_files_are_named_in_status() {
        let (mut app, _rx) = test_app();
        app.apply_snapshot(sample_snapshot(), DataSet::ALL.to_vec());
        app.apply_snapshot(sample_snapshot(), vec![DataSet::Trades, DataSet::OrderStatus]);
        assert_eq!(
            app.status_message.as_ref().map(|(m, _)| m.as_str()),
            Some("Updated: trades, order status")
        );
    }

    #[test]
    fn interval_steps_up_and_down() {
        let (mut app, rx) = test_app();
        assert_eq!(app.poll.interval, Duration::from_millis(500));
        app.step_interval(true);
        assert_eq!(app.poll.interval, Duration::from_millis(1_000));
        assert_eq!(
            rx.try_recv().unwrap(),
            PollerCommand::SetInterval(Duration::from_millis(1_000))
        );
        app.step_interval(false);
        app.step_interval(false);
        assert_eq!(app.poll.interval, Duration::from_millis(250));
    }

    #[test]
    fn interval_stops_at_bounds() {
        let (mut app, _rx) = test_app();
        for _ in 0..20 {
            app.step_interval(false);
        }
        assert_eq!(app.poll.interval, Duration::from_millis(100));
    }

    #[test]
    fn pause_sends_commands() {
        let (mut app, rx) = test_app();
        app.toggle_pause();
        assert!(app.poll.paused);
        assert_eq!(rx.try_recv().unwrap(), PollerCommand::Pause);
        app.toggle_pause();
        assert_eq!(rx.try_recv().unwrap(), PollerCommand::Resume);
    }

    #[test]
    fn scroll_is_bounded_by_rows() {
        let (mut app, _rx) = test_app();
        app.apply_snapshot(sample_snapshot(), DataSet::ALL.to_vec());
        app.active_panel = Panel::Trades;
        app.scroll(1_000);
        assert_eq!(app.trades_scroll, app.view.trades.len() - 1);
        app.scroll(-1_000);
        assert_eq!(app.trades_scroll, 0);
    }

    #[test]
    fn shrinking_data_clamps_scroll() {
        let (mut app, _rx) = test_app();
        app.apply_snapshot(sample_snapshot(), DataSet::ALL.to_vec());
        app.active_panel = Panel::Orders;
        app.scroll(1_000);
        assert!(app.orders.buy_scroll > 0);
        app.apply_snapshot(DashboardSnapshot::empty(), DataSet::ALL.to_vec());
        assert_eq!(app.orders.buy_scroll, 0);
    }

    #[test]
    fn interval_formatting() {
        assert_eq!(format_interval(Duration::from_millis(250)), "250ms");
        assert_eq!(format_interval(Duration::from_secs(5)), "5s");
        assert_eq!(format_interval(Duration::from_millis(1_500)), "1.5s");
    }
}
