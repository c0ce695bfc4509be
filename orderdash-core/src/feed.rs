//! Snapshot assembly from the four engine files.
//!
//! A poll reads every file once, fingerprints the bytes with blake3 and only
//! re-parses when something changed. Parsing the four files runs in parallel
//! on the rayon pool. Nothing in here panics on bad input: missing files,
//! unreadable files and malformed rows all become [`LoadIssue`]s attached to
//! the snapshot.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::loader::{self, RowIssue};
use crate::schema::{OrderRow, StatusRow, TradeRow};

/// The four files the engine writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSet {
    Trades,
    BuyOrders,
    SellOrders,
    OrderStatus,
}

impl DataSet {
    pub const ALL: [DataSet; 4] = [
        DataSet::Trades,
        DataSet::BuyOrders,
        DataSet::SellOrders,
        DataSet::OrderStatus,
    ];

    pub fn index(self) -> usize {
        match self {
            DataSet::Trades => 0,
            DataSet::BuyOrders => 1,
            DataSet::SellOrders => 2,
            DataSet::OrderStatus => 3,
        }
    }

    /// File name the engine uses in its working directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            DataSet::Trades => "trades.csv",
            DataSet::BuyOrders => "buy_orders.csv",
            DataSet::SellOrders => "sell_orders.csv",
            DataSet::OrderStatus => "order_status.csv",
        }
    }

    /// Columns the dashboard cannot work without.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            DataSet::Trades => &["Price", "Quantity", "Timestamp"],
            DataSet::BuyOrders | DataSet::SellOrders => &["Price", "Quantity"],
            DataSet::OrderStatus => &["Status"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DataSet::Trades => "trades",
            DataSet::BuyOrders => "buy orders",
            DataSet::SellOrders => "sell orders",
            DataSet::OrderStatus => "order status",
        }
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved paths of the four files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    paths: [PathBuf; 4],
}

impl DataSources {
    /// The engine's default file names under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            paths: DataSet::ALL.map(|d| dir.join(d.default_file_name())),
        }
    }

    /// Explicit paths, in [`DataSet::ALL`] order.
    pub fn new(trades: PathBuf, buy: PathBuf, sell: PathBuf, status: PathBuf) -> Self {
        Self {
            paths: [trades, buy, sell, status],
        }
    }

    pub fn path(&self, dataset: DataSet) -> &Path {
        &self.paths[dataset.index()]
    }
}

/// Content hash of one file, used to skip re-parsing unchanged data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fingerprint {
    Missing,
    Unreadable,
    Content(blake3::Hash),
}

/// What went wrong with one file during a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IssueKind {
    /// File does not exist yet; treated as empty.
    Missing,
    /// File exists but could not be read; treated as empty.
    Unreadable(String),
    /// Header unreadable or a required column missing; treated as empty.
    Rejected(String),
    /// Some rows failed to parse and were skipped.
    SkippedRows { count: usize, first: RowIssue },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadIssue {
    pub dataset: DataSet,
    pub kind: IssueKind,
}

impl LoadIssue {
    /// Missing files are expected before the engine first runs.
    pub fn is_warning(&self) -> bool {
        matches!(self.kind, IssueKind::Missing)
    }
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Missing => write!(f, "{}: file not found, showing no data", self.dataset),
            IssueKind::Unreadable(msg) => write!(f, "{}: {msg}", self.dataset),
            IssueKind::Rejected(msg) => write!(f, "{msg}"),
            IssueKind::SkippedRows { count, first } => write!(
                f,
                "{}: skipped {count} malformed row(s), first at line {}: {}",
                self.dataset, first.line, first.message
            ),
        }
    }
}

/// One consistent read of the four files.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub trades: Vec<TradeRow>,
    pub buy_orders: Vec<OrderRow>,
    pub sell_orders: Vec<OrderRow>,
    pub statuses: Vec<StatusRow>,
    pub issues: Vec<LoadIssue>,
    pub loaded_at: DateTime<Local>,
}

impl DashboardSnapshot {
    pub fn empty() -> Self {
        Self {
            trades: Vec::new(),
            buy_orders: Vec::new(),
            sell_orders: Vec::new(),
            statuses: Vec::new(),
            issues: Vec::new(),
            loaded_at: Local::now(),
        }
    }
}

#[derive(Debug)]
enum FileContents {
    Present(Vec<u8>),
    Missing,
    Unreadable(String),
}

impl FileContents {
    fn read(path: &Path) -> Self {
        match loader::read_source(path) {
            Ok(Some(bytes)) => FileContents::Present(bytes),
            Ok(None) => FileContents::Missing,
            Err(err) => FileContents::Unreadable(err.to_string()),
        }
    }

    fn fingerprint(&self) -> Fingerprint {
        match self {
            FileContents::Present(bytes) => Fingerprint::Content(blake3::hash(bytes)),
            FileContents::Missing => Fingerprint::Missing,
            FileContents::Unreadable(_) => Fingerprint::Unreadable,
        }
    }
}

fn read_all(sources: &DataSources) -> [FileContents; 4] {
    DataSet::ALL.map(|d| FileContents::read(sources.path(d)))
}

fn parse_contents<T: DeserializeOwned>(
    dataset: DataSet,
    contents: &FileContents,
) -> (Vec<T>, Vec<LoadIssue>) {
    let bytes = match contents {
        FileContents::Present(bytes) => bytes,
        FileContents::Missing => {
            return (
                Vec::new(),
                vec![LoadIssue {
                    dataset,
                    kind: IssueKind::Missing,
                }],
            )
        }
        FileContents::Unreadable(msg) => {
            return (
                Vec::new(),
                vec![LoadIssue {
                    dataset,
                    kind: IssueKind::Unreadable(msg.clone()),
                }],
            )
        }
    };

    match loader::parse_table::<T>(bytes, dataset) {
        Ok(table) => {
            let issues = match table.issues.first() {
                Some(first) => vec![LoadIssue {
                    dataset,
                    kind: IssueKind::SkippedRows {
                        count: table.issues.len(),
                        first: first.clone(),
                    },
                }],
                None => Vec::new(),
            };
            (table.rows, issues)
        }
        Err(err) => (
            Vec::new(),
            vec![LoadIssue {
                dataset,
                kind: IssueKind::Rejected(err.to_string()),
            }],
        ),
    }
}

fn build_snapshot(contents: &[FileContents; 4]) -> DashboardSnapshot {
    let ((trades, buys), (sells, statuses)) = rayon::join(
        || {
            rayon::join(
                || parse_contents::<TradeRow>(DataSet::Trades, &contents[0]),
                || parse_contents::<OrderRow>(DataSet::BuyOrders, &contents[1]),
            )
        },
        || {
            rayon::join(
                || parse_contents::<OrderRow>(DataSet::SellOrders, &contents[2]),
                || parse_contents::<StatusRow>(DataSet::OrderStatus, &contents[3]),
            )
        },
    );

    let mut issues = Vec::new();
    issues.extend(trades.1);
    issues.extend(buys.1);
    issues.extend(sells.1);
    issues.extend(statuses.1);

    DashboardSnapshot {
        trades: trades.0,
        buy_orders: buys.0,
        sell_orders: sells.0,
        statuses: statuses.0,
        issues,
        loaded_at: Local::now(),
    }
}

/// Read and parse all four files once.
pub fn load_snapshot(sources: &DataSources) -> DashboardSnapshot {
    build_snapshot(&read_all(sources))
}

/// Result of one poll.
#[derive(Debug)]
pub enum PollOutcome {
    Unchanged,
    Updated {
        snapshot: Box<DashboardSnapshot>,
        changed: Vec<DataSet>,
    },
}

/// Polling state: remembers what the files looked like last time.
#[derive(Debug)]
pub struct FeedState {
    sources: DataSources,
    last: Option<[Fingerprint; 4]>,
}

impl FeedState {
    pub fn new(sources: DataSources) -> Self {
        Self {
            sources,
            last: None,
        }
    }

    pub fn sources(&self) -> &DataSources {
        &self.sources
    }

    /// Re-read the files. Parses only if a fingerprint moved, or `force`.
    pub fn poll(&mut self, force: bool) -> PollOutcome {
        let contents = read_all(&self.sources);
        let fingerprints = [
            contents[0].fingerprint(),
            contents[1].fingerprint(),
            contents[2].fingerprint(),
            contents[3].fingerprint(),
        ];

        let changed: Vec<DataSet> = match &self.last {
            Some(prev) => DataSet::ALL
                .into_iter()
                .filter(|d| prev[d.index()] != fingerprints[d.index()])
                .collect(),
            None => DataSet::ALL.to_vec(),
        };

        if changed.is_empty() && !force {
            return PollOutcome::Unchanged;
        }

        let snapshot = build_snapshot(&contents);
        tracing::debug!(
            changed = ?changed,
            trades = snapshot.trades.len(),
            buys = snapshot.buy_orders.len(),
            sells = snapshot.sell_orders.len(),
            statuses = snapshot.statuses.len(),
            "snapshot reloaded"
        );
        self.last = Some(fingerprints);
        PollOutcome::Updated {
            snapshot: Box::new(snapshot),
            changed,
        }
    }
}
