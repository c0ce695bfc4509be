//! Demo data: synthetic engine output and engine input scripts.
//!
//! Lets the dashboard be tried without running the matching engine. The
//! generated files use the engine's exact headers so they go through the same
//! loader as real output.

use std::fmt::Write as _;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::DataError;
use crate::feed::DataSet;
use crate::schema::{OrderRow, OrderStatus, StatusRow, TradeRow};

/// Shape of the generated data set.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub trades: usize,
    /// Resting orders per side.
    pub resting_orders: usize,
    pub seed: u64,
    pub mid_price: i64,
    /// Unix epoch seconds of the first trade.
    pub start_timestamp: i64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            trades: 200,
            resting_orders: 20,
            seed: 42,
            mid_price: 1_000,
            start_timestamp: 1_700_000_000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SampleData {
    pub trades: Vec<TradeRow>,
    pub buy_orders: Vec<OrderRow>,
    pub sell_orders: Vec<OrderRow>,
    pub statuses: Vec<StatusRow>,
}

/// Widest distance between a resting order and the last trade price.
const MAX_BOOK_OFFSET: i64 = 15;

/// Lowest price the walk may reach, so every resting bid stays positive.
const PRICE_FLOOR: i64 = MAX_BOOK_OFFSET + 1;

pub fn generate(spec: &SampleSpec) -> SampleData {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let mut data = SampleData::default();

    let mut next_id: u64 = 1;
    let mut price = spec.mid_price.max(PRICE_FLOOR);
    let mut now = spec.start_timestamp;

    // Each trade consumes one buy and one sell order in full.
    for i in 0..spec.trades {
        price = (price + rng.gen_range(-3..=3)).max(PRICE_FLOOR);
        now += rng.gen_range(0..=2);
        let quantity: u64 = rng.gen_range(10..=100);
        let buy_id = next_id;
        let sell_id = next_id + 1;
        next_id += 2;

        data.trades.push(TradeRow {
            trade_id: i as u64 + 1,
            buy_order_id: buy_id,
            sell_order_id: sell_id,
            price,
            quantity,
            timestamp: now,
        });
        for id in [buy_id, sell_id] {
            data.statuses.push(StatusRow {
                order_id: id,
                status: OrderStatus::Filled,
                filled_quantity: quantity,
                total_quantity: quantity,
            });
        }
    }

    for side in 0..2 {
        for _ in 0..spec.resting_orders {
            now += rng.gen_range(0..=1);
            let quantity: u64 = rng.gen_range(10..=100);
            let filled_quantity = if rng.gen_bool(0.25) {
                rng.gen_range(1..quantity)
            } else {
                0
            };
            let offset = rng.gen_range(1..=MAX_BOOK_OFFSET);
            let order_price = if side == 0 {
                price - offset
            } else {
                price + offset
            };
            let order = OrderRow {
                order_id: next_id,
                price: order_price,
                quantity,
                filled_quantity,
                timestamp: now,
            };
            next_id += 1;

            data.statuses.push(StatusRow {
                order_id: order.order_id,
                status: if filled_quantity > 0 {
                    OrderStatus::Partial
                } else {
                    OrderStatus::Open
                },
                filled_quantity,
                total_quantity: quantity,
            });
            if side == 0 {
                data.buy_orders.push(order);
            } else {
                data.sell_orders.push(order);
            }
        }
    }

    // A few orders the trader pulled before they matched.
    for _ in 0..spec.resting_orders / 2 {
        let quantity: u64 = rng.gen_range(10..=100);
        data.statuses.push(StatusRow {
            order_id: next_id,
            status: OrderStatus::Cancelled,
            filled_quantity: 0,
            total_quantity: quantity,
        });
        next_id += 1;
    }

    data
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T], header: &[&str]) -> Result<(), DataError> {
    let file = std::fs::File::create(path).map_err(|source| DataError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);
    if rows.is_empty() {
        writer.write_record(header)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| DataError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Write the four files into `dir` under the engine's default names.
pub fn write_sample(dir: &Path, data: &SampleData) -> Result<(), DataError> {
    std::fs::create_dir_all(dir).map_err(|source| DataError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    const ORDER_HEADER: [&str; 5] = ["OrderID", "Price", "Quantity", "FilledQuantity", "Timestamp"];

    write_rows(
        &dir.join(DataSet::Trades.default_file_name()),
        &data.trades,
        &["TradeID", "BuyOrderID", "SellOrderID", "Price", "Quantity", "Timestamp"],
    )?;
    write_rows(
        &dir.join(DataSet::BuyOrders.default_file_name()),
        &data.buy_orders,
        &ORDER_HEADER,
    )?;
    write_rows(
        &dir.join(DataSet::SellOrders.default_file_name()),
        &data.sell_orders,
        &ORDER_HEADER,
    )?;
    write_rows(
        &dir.join(DataSet::OrderStatus.default_file_name()),
        &data.statuses,
        &["OrderID", "Status", "FilledQuantity", "TotalQuantity"],
    )?;

    tracing::info!(
        dir = %dir.display(),
        trades = data.trades.len(),
        buys = data.buy_orders.len(),
        sells = data.sell_orders.len(),
        "wrote sample data"
    );
    Ok(())
}

/// Price range used by the engine's random order script.
pub const SCRIPT_PRICE_RANGE: std::ops::RangeInclusive<i64> = 750..=1300;
/// Quantity range used by the engine's random order script.
pub const SCRIPT_QTY_RANGE: std::ops::RangeInclusive<u64> = 10..=100;

/// An input script for the engine's interactive prompt: shows the book,
/// places `count` random orders, shows the book and trade log, then exits.
pub fn order_script(count: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::from("book\n");
    for _ in 0..count {
        let side = if rng.gen_bool(0.5) { "buy" } else { "sell" };
        let price = rng.gen_range(SCRIPT_PRICE_RANGE);
        let qty = rng.gen_range(SCRIPT_QTY_RANGE);
        let _ = writeln!(out, "{side} {price} {qty}");
    }
    out.push_str("book\nlog\nexit\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{load_snapshot, DataSources};

    #[test]
    fn generation_is_deterministic() {
        let spec = SampleSpec::default();
        let a = generate(&spec);
        let b = generate(&spec);
        assert_eq!(a.trades, b.trades);
        assert_eq!(a.statuses, b.statuses);
    }

    #[test]
    fn resting_orders_straddle_last_price() {
        let data = generate(&SampleSpec::default());
        let last = data.trades.last().unwrap().price;
        assert!(data.buy_orders.iter().all(|o| o.price < last));
        assert!(data.sell_orders.iter().all(|o| o.price > last));
        assert!(data
            .buy_orders
            .iter()
            .all(|o| o.filled_quantity < o.quantity));
    }

    #[test]
    fn low_mid_price_keeps_the_book_uncrossed() {
        for seed in 0..20 {
            let data = generate(&SampleSpec {
                trades: 50,
                resting_orders: 30,
                seed,
                mid_price: 1,
                ..SampleSpec::default()
            });
            let last = data.trades.last().unwrap().price;
            assert!(data.buy_orders.iter().all(|o| o.price >= 1 && o.price < last));
            assert!(data.sell_orders.iter().all(|o| o.price > last));
        }
    }

    #[test]
    fn status_rows_cover_every_order() {
        let spec = SampleSpec::default();
        let data = generate(&spec);
        let expected = spec.trades * 2 + spec.resting_orders * 2 + spec.resting_orders / 2;
        assert_eq!(data.statuses.len(), expected);
    }

    #[test]
    fn written_sample_loads_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let data = generate(&SampleSpec::default());
        write_sample(dir.path(), &data).unwrap();

        let snap = load_snapshot(&DataSources::in_dir(dir.path()));
        assert!(snap.issues.is_empty(), "{:?}", snap.issues);
        assert_eq!(snap.trades, data.trades);
        assert_eq!(snap.sell_orders, data.sell_orders);
        assert_eq!(snap.statuses.len(), data.statuses.len());
    }

    #[test]
    fn empty_sample_still_has_headers() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(dir.path(), &SampleData::default()).unwrap();
        let text = std::fs::read_to_string(dir.path().join("trades.csv")).unwrap();
        assert!(text.starts_with("TradeID,BuyOrderID"));
        let snap = load_snapshot(&DataSources::in_dir(dir.path()));
        assert!(snap.issues.is_empty());
    }

    #[test]
    fn unwritable_target_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("trades.csv")).unwrap();
        let err = write_sample(dir.path(), &SampleData::default()).unwrap_err();
        match err {
            DataError::Write { path, .. } => assert!(path.ends_with("trades.csv")),
            other => panic!("expected a write error, got {other:?}"),
        }
    }

    #[test]
    fn order_script_shape() {
        let script = order_script(5, 7);
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "book");
        assert_eq!(&lines[6..], &["book", "log", "exit"]);
        for line in &lines[1..6] {
            let parts: Vec<&str> = line.split(' ').collect();
            assert!(parts[0] == "buy" || parts[0] == "sell");
            let price: i64 = parts[1].parse().unwrap();
            let qty: u64 = parts[2].parse().unwrap();
            assert!(SCRIPT_PRICE_RANGE.contains(&price));
            assert!(SCRIPT_QTY_RANGE.contains(&qty));
        }
    }
}
