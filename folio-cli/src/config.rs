//! CLI configuration — directory layout and defaults, from `folio.toml`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings the subcommands share. Every field has a default, so an absent
/// or partial config file is fine; command-line flags override file values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    /// Per-symbol price CSVs.
    pub data_dir: PathBuf,
    /// Per-user portfolio value CSVs.
    pub portfolio_dir: PathBuf,
    /// Per-symbol metrics JSON documents.
    pub metrics_dir: PathBuf,
    /// Default starting capital for `value`.
    pub start_value: f64,
    /// Default leaderboard size for `rank`.
    pub top_k: usize,
    /// Trailing observations in the weekly window (trading days).
    pub weekly_window: usize,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            portfolio_dir: PathBuf::from("user_portfolios"),
            metrics_dir: PathBuf::from("stock_metrics"),
            start_value: 10_000.0,
            top_k: 3,
            weekly_window: 5,
        }
    }
}

impl FolioConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Load an explicit config file, or `folio.toml` if present, or defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new("folio.toml");
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
