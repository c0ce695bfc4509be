//! Aggregations behind every dashboard view.
//!
//! All of these are plain group-by/sum passes over the snapshot rows.
//! [`DashboardView::from_snapshot`] runs them once per snapshot so the UI
//! never aggregates inside a draw call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::feed::{DashboardSnapshot, LoadIssue};
use crate::schema::{OrderRow, OrderStatus, Side, StatusRow, TradeRow};

/// Latest trade, shown in the ticker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ticker {
    pub price: i64,
    pub quantity: u64,
    pub timestamp: i64,
}

/// Headline metrics over the whole trade log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketSummary {
    pub last_price: i64,
    pub total_volume: u64,
    pub trade_count: usize,
    pub high: i64,
    pub low: i64,
    /// Volume-weighted average price. `None` when every trade has zero quantity.
    pub vwap: Option<f64>,
    pub first_timestamp: i64,
    pub last_timestamp: i64,
}

/// Aggregated quantity at one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceLevel {
    pub price: i64,
    pub quantity: u64,
    /// Number of rows folded into this level.
    pub count: usize,
}

/// Best bid / best ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TopOfBook {
    pub best_bid: Option<PriceLevel>,
    pub best_ask: Option<PriceLevel>,
}

impl TopOfBook {
    /// Ask minus bid. `None` when a side is empty or the difference does not
    /// fit in an `i64`.
    pub fn spread(&self) -> Option<i64> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => ask.price.checked_sub(bid.price),
            _ => None,
        }
    }
}

/// Count of orders in one lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
    /// Fraction of all status rows, 0.0..=1.0.
    pub share: f64,
}

pub fn ticker(trades: &[TradeRow]) -> Option<Ticker> {
    trades.last().map(|t| Ticker {
        price: t.price,
        quantity: t.quantity,
        timestamp: t.timestamp,
    })
}

pub fn market_summary(trades: &[TradeRow]) -> Option<MarketSummary> {
    let last = trades.last()?;

    let mut total_volume: u64 = 0;
    let mut notional: f64 = 0.0;
    let mut high = i64::MIN;
    let mut low = i64::MAX;
    let mut first_timestamp = i64::MAX;
    let mut last_timestamp = i64::MIN;

    for t in trades {
        total_volume = total_volume.saturating_add(t.quantity);
        notional += t.price as f64 * t.quantity as f64;
        high = high.max(t.price);
        low = low.min(t.price);
        first_timestamp = first_timestamp.min(t.timestamp);
        last_timestamp = last_timestamp.max(t.timestamp);
    }

    let vwap = if total_volume > 0 {
        Some(notional / total_volume as f64)
    } else {
        None
    };

    Some(MarketSummary {
        last_price: last.price,
        total_volume,
        trade_count: trades.len(),
        high,
        low,
        vwap,
        first_timestamp,
        last_timestamp,
    })
}

/// `2.5M` from one million up, `12,345` below.
pub fn format_volume(volume: u64) -> String {
    if volume >= 1_000_000 {
        format!("{:.1}M", volume as f64 / 1_000_000.0)
    } else {
        group_thousands(volume)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn group_by_price(rows: impl Iterator<Item = (i64, u64)>) -> BTreeMap<i64, (u64, usize)> {
    let mut levels: BTreeMap<i64, (u64, usize)> = BTreeMap::new();
    for (price, qty) in rows {
        let entry = levels.entry(price).or_default();
        entry.0 = entry.0.saturating_add(qty);
        entry.1 += 1;
    }
    levels
}

/// Sum of order quantity per price. Bids best-first (descending), asks
/// best-first (ascending).
pub fn depth(orders: &[OrderRow], side: Side) -> Vec<PriceLevel> {
    let levels = group_by_price(orders.iter().map(|o| (o.price, o.quantity)))
        .into_iter()
        .map(|(price, (quantity, count))| PriceLevel {
            price,
            quantity,
            count,
        });
    match side {
        Side::Buy => levels.rev().collect(),
        Side::Sell => levels.collect(),
    }
}

pub fn top_of_book(bids: &[PriceLevel], asks: &[PriceLevel]) -> TopOfBook {
    TopOfBook {
        best_bid: bids.first().copied(),
        best_ask: asks.first().copied(),
    }
}

/// Traded quantity per price, ascending price.
pub fn grouped_trades(trades: &[TradeRow]) -> Vec<PriceLevel> {
    group_by_price(trades.iter().map(|t| (t.price, t.quantity)))
        .into_iter()
        .map(|(price, (quantity, count))| PriceLevel {
            price,
            quantity,
            count,
        })
        .collect()
}

/// Orders per status, most common first; ties broken by label.
pub fn status_distribution(statuses: &[StatusRow]) -> Vec<StatusCount> {
    let mut counts: BTreeMap<&OrderStatus, usize> = BTreeMap::new();
    for row in statuses {
        *counts.entry(&row.status).or_default() += 1;
    }

    let total = statuses.len();
    let mut out: Vec<StatusCount> = counts
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.clone(),
            count,
            share: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            },
        })
        .collect();
    out.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.status.label().cmp(b.status.label()))
    });
    out
}

/// X axis used for the price trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceAxis {
    /// Trade timestamp, as the engine wrote it.
    #[default]
    Timestamp,
    /// Position in the trade log; spreads out trades sharing a second.
    Sequence,
}

impl PriceAxis {
    pub fn toggle(self) -> Self {
        match self {
            PriceAxis::Timestamp => PriceAxis::Sequence,
            PriceAxis::Sequence => PriceAxis::Timestamp,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceAxis::Timestamp => "Time",
            PriceAxis::Sequence => "Trade #",
        }
    }
}

/// `(x, price)` points in file order.
pub fn price_series(trades: &[TradeRow], axis: PriceAxis) -> Vec<(f64, f64)> {
    trades
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let x = match axis {
                PriceAxis::Timestamp => t.timestamp as f64,
                PriceAxis::Sequence => i as f64,
            };
            (x, t.price as f64)
        })
        .collect()
}

/// Everything the dashboard draws, derived from one snapshot.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub ticker: Option<Ticker>,
    pub summary: Option<MarketSummary>,
    pub buy_depth: Vec<PriceLevel>,
    pub sell_depth: Vec<PriceLevel>,
    pub top_of_book: TopOfBook,
    pub grouped_trades: Vec<PriceLevel>,
    pub status_counts: Vec<StatusCount>,
    /// Newest first.
    pub trades: Vec<TradeRow>,
    /// Newest first.
    pub buy_orders: Vec<OrderRow>,
    /// Newest first.
    pub sell_orders: Vec<OrderRow>,
    pub issues: Vec<LoadIssue>,
    /// Unreversed trades, for the price series.
    chronological: Vec<TradeRow>,
}

impl DashboardView {
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Self {
        let buy_depth = depth(&snapshot.buy_orders, Side::Buy);
        let sell_depth = depth(&snapshot.sell_orders, Side::Sell);
        let top_of_book = top_of_book(&buy_depth, &sell_depth);

        Self {
            ticker: ticker(&snapshot.trades),
            summary: market_summary(&snapshot.trades),
            buy_depth,
            sell_depth,
            top_of_book,
            grouped_trades: grouped_trades(&snapshot.trades),
            status_counts: status_distribution(&snapshot.statuses),
            trades: snapshot.trades.iter().rev().cloned().collect(),
            buy_orders: snapshot.buy_orders.iter().rev().cloned().collect(),
            sell_orders: snapshot.sell_orders.iter().rev().cloned().collect(),
            issues: snapshot.issues.clone(),
            chronological: snapshot.trades.clone(),
        }
    }

    pub fn empty() -> Self {
        Self::from_snapshot(&DashboardSnapshot::empty())
    }

    pub fn price_series(&self, axis: PriceAxis) -> Vec<(f64, f64)> {
        price_series(&self.chronological, axis)
    }

    pub fn orders(&self, side: Side) -> &[OrderRow] {
        match side {
            Side::Buy => &self.buy_orders,
            Side::Sell => &self.sell_orders,
        }
    }

    pub fn depth(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Buy => &self.buy_depth,
            Side::Sell => &self.sell_depth,
        }
    }

    pub fn status_total(&self) -> usize {
        self.status_counts.iter().map(|s| s.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(price: i64, quantity: u64, timestamp: i64) -> TradeRow {
        TradeRow {
            trade_id: 0,
            buy_order_id: 0,
            sell_order_id: 0,
            price,
            quantity,
            timestamp,
        }
    }

    fn order(id: u64, price: i64, quantity: u64) -> OrderRow {
        OrderRow {
            order_id: id,
            price,
            quantity,
            filled_quantity: 0,
            timestamp: id as i64,
        }
    }

    fn status(s: &str) -> StatusRow {
        StatusRow {
            order_id: 0,
            status: OrderStatus::parse(s),
            filled_quantity: 0,
            total_quantity: 0,
        }
    }

    #[test]
    fn ticker_is_last_row() {
        let trades = vec![trade(100, 1, 1), trade(105, 7, 2)];
        assert_eq!(
            ticker(&trades),
            Some(Ticker {
                price: 105,
                quantity: 7,
                timestamp: 2
            })
        );
        assert_eq!(ticker(&[]), None);
    }

    #[test]
    fn summary_totals() {
        let trades = vec![trade(100, 10, 5), trade(110, 30, 3), trade(90, 10, 9)];
        let s = market_summary(&trades).unwrap();
        assert_eq!(s.last_price, 90);
        assert_eq!(s.total_volume, 50);
        assert_eq!(s.trade_count, 3);
        assert_eq!(s.high, 110);
        assert_eq!(s.low, 90);
        assert_eq!(s.first_timestamp, 3);
        assert_eq!(s.last_timestamp, 9);
        let vwap = s.vwap.unwrap();
        assert!((vwap - 104.0).abs() < 1e-9);
    }

    #[test]
    fn summary_empty_is_none() {
        assert!(market_summary(&[]).is_none());
    }

    #[test]
    fn volume_formatting() {
        assert_eq!(format_volume(0), "0");
        assert_eq!(format_volume(999), "999");
        assert_eq!(format_volume(1_000), "1,000");
        assert_eq!(format_volume(999_999), "999,999");
        assert_eq!(format_volume(1_000_000), "1.0M");
        assert_eq!(format_volume(2_460_000), "2.5M");
    }

    #[test]
    fn buy_depth_descends_and_sell_ascends() {
        let orders = vec![order(1, 100, 5), order(2, 102, 3), order(3, 100, 4)];
        let bids = depth(&orders, Side::Buy);
        assert_eq!(bids.iter().map(|l| l.price).collect::<Vec<_>>(), vec![102, 100]);
        assert_eq!(bids[1].quantity, 9);
        assert_eq!(bids[1].count, 2);

        let asks = depth(&orders, Side::Sell);
        assert_eq!(asks.iter().map(|l| l.price).collect::<Vec<_>>(), vec![100, 102]);
    }

    #[test]
    fn spread_needs_both_sides() {
        let bids = depth(&[order(1, 99, 5)], Side::Buy);
        let asks = depth(&[order(2, 101, 5), order(3, 104, 1)], Side::Sell);
        let tob = top_of_book(&bids, &asks);
        assert_eq!(tob.spread(), Some(2));
        assert_eq!(top_of_book(&bids, &[]).spread(), None);
    }

    #[test]
    fn spread_of_extreme_prices_is_none() {
        let level = |price| PriceLevel {
            price,
            quantity: 1,
            count: 1,
        };
        let tob = TopOfBook {
            best_bid: Some(level(-10)),
            best_ask: Some(level(i64::MAX)),
        };
        assert_eq!(tob.spread(), None);

        let crossed = TopOfBook {
            best_bid: Some(level(105)),
            best_ask: Some(level(100)),
        };
        assert_eq!(crossed.spread(), Some(-5));
    }

    #[test]
    fn status_counts_sorted_by_frequency() {
        let rows = vec![
            status("FILLED"),
            status("OPEN"),
            status("FILLED"),
            status("CANCELLED"),
            status("OPEN"),
            status("FILLED"),
        ];
        let dist = status_distribution(&rows);
        assert_eq!(dist[0].status, OrderStatus::Filled);
        assert_eq!(dist[0].count, 3);
        assert!((dist[0].share - 0.5).abs() < 1e-9);
        // OPEN (2) then CANCELLED (1)
        assert_eq!(dist[1].status, OrderStatus::Open);
        assert_eq!(dist[2].status, OrderStatus::Cancelled);
    }

    #[test]
    fn status_ties_break_by_label() {
        let rows = vec![status("PARTIAL"), status("CANCELLED")];
        let dist = status_distribution(&rows);
        assert_eq!(dist[0].status, OrderStatus::Cancelled);
        assert_eq!(dist[1].status, OrderStatus::Partial);
    }

    #[test]
    fn grouped_trades_ascending() {
        let trades = vec![trade(105, 1, 1), trade(100, 2, 2), trade(105, 3, 3)];
        let grouped = grouped_trades(&trades);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].price, 100);
        assert_eq!(grouped[1].quantity, 4);
    }

    #[test]
    fn price_axis_sequence_uses_position() {
        let trades = vec![trade(100, 1, 50), trade(101, 1, 50)];
        let by_time = price_series(&trades, PriceAxis::Timestamp);
        assert_eq!(by_time[1], (50.0, 101.0));
        let by_seq = price_series(&trades, PriceAxis::Sequence);
        assert_eq!(by_seq[1], (1.0, 101.0));
    }

    #[test]
    fn view_tables_are_newest_first() {
        let mut snap = DashboardSnapshot::empty();
        snap.trades = vec![trade(100, 1, 1), trade(101, 1, 2)];
        snap.buy_orders = vec![order(1, 99, 1), order(2, 98, 1)];
        let view = DashboardView::from_snapshot(&snap);
        assert_eq!(view.trades[0].price, 101);
        assert_eq!(view.buy_orders[0].order_id, 2);
        assert_eq!(view.price_series(PriceAxis::Sequence)[0], (0.0, 100.0));
    }
}
