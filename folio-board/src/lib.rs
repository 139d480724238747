//! Folio Board — everything that operates over many users' portfolios.
//!
//! This crate builds on `folio-core` to provide:
//! - Leaderboard ranking over persisted portfolio value series
//!   (full-history and trailing windows, caller excluded)
//! - Portfolio value persistence behind a narrow key-value trait
//!   (CSV directory store, in-memory fake)
//! - Instrument metrics persistence with upsert semantics
//! - Output adapters: tabular rows, chart series, CSV artifacts

pub mod leaderboard;
pub mod metrics_store;
pub mod report;
pub mod store;

pub use leaderboard::{
    normalized_return, rank, rank_from_store, LeaderboardEntry, RankError, RankWindow,
};
pub use metrics_store::{JsonMetricsStore, MetricsStore};
pub use report::{export_overlay_csv, export_series_csv, to_rows, ChartSeries, SeriesRow};
pub use store::{CsvPortfolioStore, InMemoryPortfolioStore, PortfolioStore, StoreError};
