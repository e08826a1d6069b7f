//! # Configuration
//!
//! Settings live in `config.json` inside the data directory. A missing file, or a
//! missing key inside it, yields the compiled default.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `low-stock-threshold` | `100` | Inventory quantities below this are low stock |
//! | `expiry-window-days` | `3` | Days ahead an expiry date counts as "expiring soon" |

use crate::error::{FarmError, Result};
use crate::model::Thresholds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 100;
const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 3;

pub const KEYS: &[&str] = &["low-stock-threshold", "expiry-window-days"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FarmchainxConfig {
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: u32,

    #[serde(default = "default_expiry_window_days")]
    pub expiry_window_days: i64,
}

fn default_low_stock_threshold() -> u32 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

fn default_expiry_window_days() -> i64 {
    DEFAULT_EXPIRY_WINDOW_DAYS
}

impl Default for FarmchainxConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            expiry_window_days: DEFAULT_EXPIRY_WINDOW_DAYS,
        }
    }
}

impl FarmchainxConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "low-stock-threshold" => Some(self.low_stock_threshold.to_string()),
            "expiry-window-days" => Some(self.expiry_window_days.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || FarmError::Config(format!("Invalid value for {}: {}", key, value));
        match key {
            "low-stock-threshold" => {
                self.low_stock_threshold = value.trim().parse().map_err(|_| invalid())?;
            }
            "expiry-window-days" => {
                let days: i64 = value.trim().parse().map_err(|_| invalid())?;
                if days < 0 {
                    return Err(invalid());
                }
                self.expiry_window_days = days;
            }
            _ => return Err(FarmError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            low_stock_below: self.low_stock_threshold,
            expiry_window_days: self.expiry_window_days,
        }
    }
}
