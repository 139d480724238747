//! Folio Core — portfolio valuation engine.
//!
//! This crate contains the computational heart of the system:
//! - Domain value types (price series, value series, aligned price matrix)
//! - Price store access behind an injected trait (CSV directory store,
//!   in-memory fake) and matrix assembly via incremental inner joins
//! - Portfolio valuation from allocation weights and a starting value
//! - Series normalization to a common 1.0 base
//! - Per-instrument return/risk statistics
//! - Market-data acquisition (provider trait, Yahoo Finance client,
//!   deterministic synthetic generator)
//!
//! Every operation is a pure function over immutable inputs: no internal
//! caches, no shared mutable state, no retries. Concurrent valuations are
//! safe by construction.

pub mod data;
pub mod domain;
pub mod normalize;
pub mod stats;
pub mod valuation;

pub use data::{
    date_range, download_symbols, load_matrix, synthetic_series, CsvPriceStore, DataError,
    DownloadProgress, DownloadSummary, InMemoryPriceStore, PriceProvider, PriceStore,
    StdoutProgress, YahooProvider,
};
pub use domain::{
    MatrixError, PriceMatrix, PricePoint, PriceSeries, SeriesError, ValuePoint, ValueSeries,
};
pub use normalize::{normalize, normalize_prices, NormalizeError, NormalizedSeries};
pub use stats::{daily_returns, InstrumentStats, StatsError};
pub use valuation::{value_portfolio, ValuationError};
