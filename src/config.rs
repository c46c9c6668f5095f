use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::NowcastError;
use crate::solver::SolveOptions;

pub const DEFAULT_K_LAST: usize = 3;
pub const DEFAULT_TOP_OTHERS: usize = 4;
pub const DEFAULT_DT_MEDIAN_WINDOW: usize = 20;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Aggregated market table produced by the market-data collaborator.
    pub df_path: PathBuf,
    pub target: String,
    /// Trades per local regression window.
    pub k_last: usize,
    /// Peers added next to the target.
    pub top_others: usize,
    /// Inter-arrival times used for the `dt_hat` median.
    pub dt_median_window: usize,
    /// Feature-table CSV destination.
    pub xy_out: PathBuf,
    pub scale_columns: bool,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            df_path: PathBuf::from("df_all.csv"),
            target: String::new(),
            k_last: DEFAULT_K_LAST,
            top_others: DEFAULT_TOP_OTHERS,
            dt_median_window: DEFAULT_DT_MEDIAN_WINDOW,
            xy_out: PathBuf::from("xy_train.csv"),
            scale_columns: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to parse run config")
    }

    /// Load a TOML run config. `.env` is honoured for logging overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        dotenvy::dotenv().ok();
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn validate(&self) -> std::result::Result<(), NowcastError> {
        if self.target.trim().is_empty() {
            return Err(NowcastError::Config("target must be set".to_string()));
        }
        if self.k_last == 0 {
            return Err(NowcastError::Config("k_last must be >= 1".to_string()));
        }
        if self.dt_median_window == 0 {
            return Err(NowcastError::Config(
                "dt_median_window must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            scale_columns: self.scale_columns,
        }
    }
}
