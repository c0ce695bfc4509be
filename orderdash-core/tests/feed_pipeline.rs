//! Integration tests for the read → snapshot → view pipeline.
//!
//! Files are written the way the matching engine writes them, including the
//! awkward cases it produces in practice: files that do not exist yet, a
//! header with no rows, and a last line cut off mid-write.

use std::path::Path;

use orderdash_core::aggregate::format_volume;
use orderdash_core::feed::IssueKind;
use orderdash_core::{
    DashboardConfig, DashboardView, DataSet, DataSources, FeedState, OrderStatus, PollOutcome,
};

fn write(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
}

fn engine_fixture(dir: &Path) {
    write(
        dir,
        "trades.csv",
        "TradeID,BuyOrderID,SellOrderID,Price,Quantity,Timestamp\n\
         1,2,1,1000,40,1700000000\n\
         2,4,3,1002,60,1700000001\n\
         3,5,3,1001,25,1700000005\n",
    );
    write(
        dir,
        "buy_orders.csv",
        "OrderID,Price,Quantity,FilledQuantity,Timestamp\n\
         6,998,30,0,1700000006\n\
         7,999,10,5,1700000007\n\
         8,998,15,0,1700000008\n",
    );
    write(
        dir,
        "sell_orders.csv",
        "OrderID,Price,Quantity,FilledQuantity,Timestamp\n\
         3,1003,100,85,1700000001\n\
         9,1005,50,0,1700000009\n",
    );
    write(
        dir,
        "order_status.csv",
        "OrderID,Status,FilledQuantity,TotalQuantity\n\
         1,FILLED,40,40\n\
         2,FILLED,40,40\n\
         3,PARTIAL,85,100\n\
         4,FILLED,60,60\n\
         5,FILLED,25,25\n\
         6,OPEN,0,30\n\
         7,PARTIAL,5,10\n\
         8,OPEN,0,15\n\
         9,OPEN,0,50\n\
         10,CANCELLED,0,20\n",
    );
}

#[test]
fn full_view_from_engine_files() {
    let dir = tempfile::tempdir().unwrap();
    engine_fixture(dir.path());

    let mut feed = FeedState::new(DataSources::in_dir(dir.path()));
    let snapshot = match feed.poll(false) {
        PollOutcome::Updated { snapshot, .. } => snapshot,
        PollOutcome::Unchanged => panic!("first poll must load"),
    };
    assert!(snapshot.issues.is_empty());

    let view = DashboardView::from_snapshot(&snapshot);

    let ticker = view.ticker.unwrap();
    assert_eq!((ticker.price, ticker.quantity), (1001, 25));

    let summary = view.summary.unwrap();
    assert_eq!(summary.total_volume, 125);
    assert_eq!(format_volume(summary.total_volume), "125");

    let bid_prices: Vec<i64> = view.buy_depth.iter().map(|l| l.price).collect();
    assert_eq!(bid_prices, vec![999, 998]);
    assert_eq!(view.buy_depth[1].quantity, 45);

    let ask_prices: Vec<i64> = view.sell_depth.iter().map(|l| l.price).collect();
    assert_eq!(ask_prices, vec![1003, 1005]);
    assert_eq!(view.top_of_book.spread(), Some(4));

    assert_eq!(view.status_counts[0].status, OrderStatus::Filled);
    assert_eq!(view.status_counts[0].count, 4);
    assert_eq!(view.status_total(), 10);

    assert_eq!(view.buy_orders[0].order_id, 8);
    assert_eq!(view.trades[0].trade_id, 3);
}

#[test]
fn engine_not_started_yet() {
    let dir = tempfile::tempdir().unwrap();
    let mut feed = FeedState::new(DataSources::in_dir(dir.path()));
    let snapshot = match feed.poll(false) {
        PollOutcome::Updated { snapshot, .. } => snapshot,
        PollOutcome::Unchanged => panic!("first poll must load"),
    };
    let view = DashboardView::from_snapshot(&snapshot);
    assert!(view.ticker.is_none());
    assert!(view.summary.is_none());
    assert!(view.buy_depth.is_empty());
    assert!(view.status_counts.is_empty());
    assert!(view.issues.iter().all(|i| i.is_warning()));
}

#[test]
fn truncated_last_line_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    engine_fixture(dir.path());
    write(
        dir.path(),
        "trades.csv",
        "TradeID,BuyOrderID,SellOrderID,Price,Quantity,Timestamp\n\
         1,2,1,1000,40,1700000000\n\
         2,4,3,10",
    );

    let snapshot = orderdash_core::feed::load_snapshot(&DataSources::in_dir(dir.path()));
    assert_eq!(snapshot.trades.len(), 1);
    let issue = snapshot
        .issues
        .iter()
        .find(|i| i.dataset == DataSet::Trades)
        .expect("trades issue");
    match &issue.kind {
        IssueKind::SkippedRows { count, first } => {
            assert_eq!(*count, 1);
            assert_eq!(first.line, 3);
        }
        other => panic!("unexpected issue kind: {other:?}"),
    }
}

#[test]
fn config_file_names_are_honoured() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "fills.csv",
        "Price,Quantity,Timestamp\n500,3,1\n",
    );
    let config = DashboardConfig::from_toml_str(&format!(
        "data_dir = {:?}\n[files]\ntrades = \"fills.csv\"\n",
        dir.path().display().to_string()
    ))
    .unwrap();

    let snapshot = orderdash_core::feed::load_snapshot(&config.sources());
    assert_eq!(snapshot.trades.len(), 1);
    assert_eq!(snapshot.trades[0].price, 500);
}
