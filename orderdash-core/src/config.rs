//! Dashboard configuration (TOML).
//!
//! Resolution order: an explicit path (which must exist), then
//! `./orderdash.toml` if present, then built-in defaults. Command-line flags
//! are applied on top by the binaries.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::feed::{DataSet, DataSources};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "orderdash.toml";

pub const MIN_REFRESH_MS: u64 = 100;
pub const MAX_REFRESH_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory the engine writes its CSV files into.
    pub data_dir: PathBuf,
    /// Poll interval in milliseconds.
    pub refresh_ms: u64,
    /// Prefix for prices in the ticker and metrics.
    pub currency: String,
    pub files: FileNames,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNames {
    pub trades: String,
    pub buy_orders: String,
    pub sell_orders: String,
    pub order_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Row cap for the order and trade tables.
    pub max_rows: usize,
    /// Depth levels shown per side in the bar charts.
    pub depth_levels: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            refresh_ms: 500,
            currency: "₹".to_string(),
            files: FileNames::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            trades: DataSet::Trades.default_file_name().to_string(),
            buy_orders: DataSet::BuyOrders.default_file_name().to_string(),
            sell_orders: DataSet::SellOrders.default_file_name().to_string(),
            order_status: DataSet::OrderStatus.default_file_name().to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            max_rows: 500,
            depth_levels: 20,
        }
    }
}

impl DashboardConfig {
    /// Load from `explicit` if given, else `./orderdash.toml` if it exists,
    /// else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)
            }
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(text)?;
        config.refresh_ms = clamp_refresh_ms(config.refresh_ms);
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, refresh_ms: Option<u64>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(ms) = refresh_ms {
            self.refresh_ms = clamp_refresh_ms(ms);
        }
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(clamp_refresh_ms(self.refresh_ms))
    }

    pub fn sources(&self) -> DataSources {
        DataSources::new(
            self.data_dir.join(&self.files.trades),
            self.data_dir.join(&self.files.buy_orders),
            self.data_dir.join(&self.files.sell_orders),
            self.data_dir.join(&self.files.order_status),
        )
    }
}

pub fn clamp_refresh_ms(ms: u64) -> u64 {
    ms.clamp(MIN_REFRESH_MS, MAX_REFRESH_MS)
}
