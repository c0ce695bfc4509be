//! orderdash CLI — one-shot commands around the matching engine's files.
//!
//! Commands:
//! - `summary` — load the four CSV files once and print the dashboard numbers
//! - `sample` — write a synthetic set of engine output files
//! - `script` — write a random order script for the engine's prompt

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use orderdash_core::feed::load_snapshot;
use orderdash_core::report::SummaryReport;
use orderdash_core::sample::{generate, order_script, write_sample, SampleSpec};
use orderdash_core::{DashboardConfig, DashboardView};

#[derive(Parser)]
#[command(
    name = "orderdash",
    version,
    about = "orderdash CLI — order book dashboard utilities"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the engine files once and print the dashboard summary.
    Summary {
        /// Directory holding the engine's CSV files. Overrides the config.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Path to a TOML config file. Defaults to ./orderdash.toml when present.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Price levels to show per side of the book.
        #[arg(long)]
        depth: Option<usize>,

        /// Write the summary to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write synthetic trades, resting orders and statuses.
    Sample {
        /// Target directory. Created if missing.
        #[arg(long)]
        out_dir: PathBuf,

        /// Number of trades.
        #[arg(long, default_value_t = 200)]
        trades: usize,

        /// Resting orders per side.
        #[arg(long, default_value_t = 20)]
        orders: usize,

        /// Random seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Starting price of the random walk.
        #[arg(long, default_value_t = 1_000)]
        mid_price: i64,
    },
    /// Write a random order script the engine reads from stdin.
    Script {
        /// Number of buy/sell lines.
        #[arg(long, default_value_t = 1_000)]
        count: usize,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Random seed. Defaults to the current time.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary {
            data_dir,
            config,
            json,
            depth,
            out,
        } => run_summary(data_dir, config.as_deref(), json, depth, out.as_deref()),
        Commands::Sample {
            out_dir,
            trades,
            orders,
            seed,
            mid_price,
        } => run_sample(&out_dir, trades, orders, seed, mid_price),
        Commands::Script { count, out, seed } => run_script(count, out.as_deref(), seed),
    }
}

fn run_summary(
    data_dir: Option<PathBuf>,
    config_path: Option<&Path>,
    json: bool,
    depth: Option<usize>,
    out: Option<&Path>,
) -> Result<()> {
    let config = DashboardConfig::resolve(config_path)
        .context("Failed to load config")?
        .with_overrides(data_dir, None);
    if !config.data_dir.is_dir() {
        bail!("data directory does not exist: {}", config.data_dir.display());
    }

    let snapshot = load_snapshot(&config.sources());
    for issue in &snapshot.issues {
        if issue.is_warning() {
            tracing::warn!(dataset = %issue.dataset, "{issue}");
        } else {
            tracing::error!(dataset = %issue.dataset, "{issue}");
        }
    }

    let view = DashboardView::from_snapshot(&snapshot);
    let levels = depth.unwrap_or(config.ui.depth_levels).max(1);
    let report = SummaryReport::from_view(&view, levels);

    let rendered = if json {
        report.to_json().context("Failed to serialize summary")?
    } else {
        report.to_text(&config.currency)
    };

    match out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Summary written to: {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn run_sample(out_dir: &Path, trades: usize, orders: usize, seed: u64, mid_price: i64) -> Result<()> {
    if mid_price <= 0 {
        bail!("--mid-price must be positive");
    }
    let spec = SampleSpec {
        trades,
        resting_orders: orders,
        seed,
        mid_price,
        ..SampleSpec::default()
    };
    let data = generate(&spec);
    write_sample(out_dir, &data)
        .with_context(|| format!("Failed to write sample data to {}", out_dir.display()))?;

    println!(
        "Wrote {} trades, {} buy orders, {} sell orders, {} status rows to {}",
        data.trades.len(),
        data.buy_orders.len(),
        data.sell_orders.len(),
        data.statuses.len(),
        out_dir.display()
    );
    Ok(())
}

fn run_script(count: usize, out: Option<&Path>, seed: Option<u64>) -> Result<()> {
    let seed = seed.unwrap_or_else(|| chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0) as u64);
    let script = order_script(count, seed);

    match out {
        Some(path) => {
            std::fs::write(path, &script)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), count, seed, "wrote order script");
            println!("Wrote {count} orders to {}", path.display());
        }
        None => print!("{script}"),
    }
    Ok(())
}
