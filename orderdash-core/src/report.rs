//! One-shot summaries of a snapshot: JSON export and a plain-text report.

use std::fmt::Write as _;

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

use crate::aggregate::{
    format_volume, DashboardView, MarketSummary, PriceLevel, StatusCount, Ticker, TopOfBook,
};
use crate::feed::LoadIssue;

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub generated_at: DateTime<Local>,
    pub ticker: Option<Ticker>,
    pub summary: Option<MarketSummary>,
    pub top_of_book: TopOfBook,
    pub spread: Option<i64>,
    pub buy_depth: Vec<PriceLevel>,
    pub sell_depth: Vec<PriceLevel>,
    pub grouped_trades: Vec<PriceLevel>,
    pub status_counts: Vec<StatusCount>,
    pub active_buy_orders: usize,
    pub active_sell_orders: usize,
    pub issues: Vec<String>,
}

impl SummaryReport {
    /// `depth_levels` caps each side of the book.
    pub fn from_view(view: &DashboardView, depth_levels: usize) -> Self {
        Self {
            generated_at: Local::now(),
            ticker: view.ticker,
            summary: view.summary,
            top_of_book: view.top_of_book,
            spread: view.top_of_book.spread(),
            buy_depth: view.buy_depth.iter().take(depth_levels).copied().collect(),
            sell_depth: view.sell_depth.iter().take(depth_levels).copied().collect(),
            grouped_trades: view.grouped_trades.clone(),
            status_counts: view.status_counts.clone(),
            active_buy_orders: view.buy_orders.len(),
            active_sell_orders: view.sell_orders.len(),
            issues: view.issues.iter().map(LoadIssue::to_string).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self, currency: &str) -> String {
        let mut out = String::new();

        match &self.ticker {
            Some(t) => {
                let _ = writeln!(
                    out,
                    "Live Ticker: {currency}{} | Qty: {} | Time: {}",
                    t.price,
                    t.quantity,
                    format_timestamp(t.timestamp)
                );
            }
            None => out.push_str("Live Ticker: No trades yet.\n"),
        }
        out.push('\n');

        out.push_str("Market Summary\n");
        match &self.summary {
            Some(s) => {
                let _ = writeln!(out, "  Last Traded Price    {currency}{}", s.last_price);
                let _ = writeln!(
                    out,
                    "  Total Volume Traded  {} units",
                    format_volume(s.total_volume)
                );
                let _ = writeln!(out, "  Trades               {}", s.trade_count);
                let _ = writeln!(out, "  High / Low           {currency}{} / {currency}{}", s.high, s.low);
                if let Some(vwap) = s.vwap {
                    let _ = writeln!(out, "  VWAP                 {currency}{vwap:.2}");
                }
            }
            None => out.push_str("  No trades yet.\n  No volume recorded.\n"),
        }
        out.push('\n');

        out.push_str("Top of Book\n");
        let _ = writeln!(out, "  Best Bid  {}", level_text(self.top_of_book.best_bid, currency));
        let _ = writeln!(out, "  Best Ask  {}", level_text(self.top_of_book.best_ask, currency));
        if let Some(spread) = self.spread {
            let _ = writeln!(out, "  Spread    {currency}{spread}");
        }
        out.push('\n');

        depth_text(&mut out, "Buy Orders", &self.buy_depth, "No active buy orders.");
        depth_text(&mut out, "Sell Orders", &self.sell_depth, "No active sell orders.");

        out.push_str("Order Status Distribution\n");
        if self.status_counts.is_empty() {
            out.push_str("  No order status data available.\n");
        } else {
            for s in &self.status_counts {
                let _ = writeln!(
                    out,
                    "  {:<10} {:>6}  {:>5.1}%",
                    s.status.label(),
                    s.count,
                    s.share * 100.0
                );
            }
        }

        if !self.issues.is_empty() {
            out.push_str("\nIssues\n");
            for issue in &self.issues {
                let _ = writeln!(out, "  - {issue}");
            }
        }

        out
    }
}

fn level_text(level: Option<PriceLevel>, currency: &str) -> String {
    match level {
        Some(l) => format!("{} @ {currency}{}", l.quantity, l.price),
        None => "-".to_string(),
    }
}

fn depth_text(out: &mut String, title: &str, levels: &[PriceLevel], empty: &str) {
    let _ = writeln!(out, "{title}");
    if levels.is_empty() {
        let _ = writeln!(out, "  {empty}");
    } else {
        for l in levels {
            let _ = writeln!(out, "  {:>8}  {:>8}", l.price, l.quantity);
        }
    }
    out.push('\n');
}

/// Local wall-clock time for an epoch-seconds timestamp; the raw number if it
/// is out of range.
pub fn format_timestamp(epoch_secs: i64) -> String {
    match Local.timestamp_opt(epoch_secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => epoch_secs.to_string(),
    }
}
