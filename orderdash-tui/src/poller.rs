//! Background poller thread — all file I/O and parsing runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The poller
//! re-reads the engine files on a fixed interval and only ships a new
//! snapshot when a file's content fingerprint changed.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use orderdash_core::{DashboardSnapshot, DataSet, DataSources, FeedState, PollOutcome};

/// Commands sent from the TUI to the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerCommand {
    /// Reload and publish even if nothing changed.
    RefreshNow,
    SetInterval(Duration),
    Pause,
    Resume,
    Shutdown,
}

/// Responses sent from the poller back to the TUI.
#[derive(Debug)]
pub enum PollerResponse {
    Snapshot {
        snapshot: Box<DashboardSnapshot>,
        changed: Vec<DataSet>,
    },
    Unchanged {
        checked_at: DateTime<Local>,
    },
}

/// Spawn the poller thread. It publishes an initial snapshot right away.
pub fn spawn_poller(
    sources: DataSources,
    interval: Duration,
    rx: Receiver<PollerCommand>,
    tx: Sender<PollerResponse>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("orderdash-poller".into())
        .spawn(move || {
            poller_loop(FeedState::new(sources), interval, rx, tx);
        })
}

/// Returns false once the UI side hung up.
fn publish(tx: &Sender<PollerResponse>, outcome: PollOutcome) -> bool {
    let response = match outcome {
        PollOutcome::Updated { snapshot, changed } => PollerResponse::Snapshot { snapshot, changed },
        PollOutcome::Unchanged => PollerResponse::Unchanged {
            checked_at: Local::now(),
        },
    };
    tx.send(response).is_ok()
}

fn poller_loop(
    mut feed: FeedState,
    mut interval: Duration,
    rx: Receiver<PollerCommand>,
    tx: Sender<PollerResponse>,
) {
    tracing::info!(
        trades = %feed.sources().path(DataSet::Trades).display(),
        interval_ms = interval.as_millis() as u64,
        "poller started"
    );

    if !publish(&tx, feed.poll(true)) {
        return;
    }
    let mut next_poll = Instant::now() + interval;
    let mut paused = false;

    loop {
        let received = if paused {
            rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
        } else {
            rx.recv_timeout(next_poll.saturating_duration_since(Instant::now()))
        };

        let outcome = match received {
            Ok(PollerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(PollerCommand::RefreshNow) => feed.poll(true),
            Ok(PollerCommand::SetInterval(new_interval)) => {
                tracing::info!(interval_ms = new_interval.as_millis() as u64, "poll interval changed");
                interval = new_interval;
                next_poll = Instant::now() + interval;
                continue;
            }
            Ok(PollerCommand::Pause) => {
                tracing::info!("polling paused");
                paused = true;
                continue;
            }
            Ok(PollerCommand::Resume) => {
                tracing::info!("polling resumed");
                paused = false;
                feed.poll(false)
            }
            Err(RecvTimeoutError::Timeout) => feed.poll(false),
        };

        next_poll = Instant::now() + interval;
        if !publish(&tx, outcome) {
            break;
        }
    }

    tracing::info!("poller stopped");
}
