//! Runtime configuration for the InternSwap engine.
//!
//! All parameters have production defaults; a JSON file and environment
//! overrides can adjust them without code changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;
use types::Wad;

/// Environment override for the accrual rate.
const ACCRUAL_RATE_ENV: &str = "INTERNSWAP_ACCRUAL_RATE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Reward units accrued per LP share per elapsed day. The default of 1
    /// means one reward unit per share-day, wad-for-wad.
    #[serde(default = "default_accrual_rate")]
    pub accrual_rate_per_share: Wad,
}

fn default_accrual_rate() -> Wad {
    1
}

impl Default for Config {
    fn default() -> Self {
        Config {
            accrual_rate_per_share: default_accrual_rate(),
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file, then applies environment
    /// overrides on top.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_json::from_str(&raw)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Applies recognized environment variables over the current values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var(ACCRUAL_RATE_ENV) {
            match value.parse() {
                Ok(rate) => self.accrual_rate_per_share = rate,
                Err(_) => warn!(%value, "ignoring unparseable {ACCRUAL_RATE_ENV} override"),
            }
        }
    }
}
