//! Data provider trait and structured error types.
//!
//! The PriceProvider trait abstracts over upstream market-data sources so
//! implementations can be swapped and mocked for tests. The store layer sits
//! below this trait — providers don't know where series end up.

use crate::domain::{MatrixError, PriceSeries, SeriesError};
use chrono::NaiveDate;
use thiserror::Error;

/// Structured error types for price data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// The requested symbol has no backing series anywhere we looked.
    #[error("no price series for symbol '{symbol}'")]
    DataUnavailable { symbol: String },

    #[error("no symbols requested")]
    NoSymbols,

    #[error("invalid series for '{symbol}': {source}")]
    InvalidSeries {
        symbol: String,
        source: SeriesError,
    },

    #[error("malformed price file for '{symbol}': {reason}")]
    Malformed { symbol: String, reason: String },

    #[error(transparent)]
    InvalidMatrix(#[from] MatrixError),

    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("provider response format changed: {0}")]
    ResponseFormat(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for upstream price-history sources (Yahoo Finance, fixtures, etc).
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the daily adjusted-close series for a symbol over a date range.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError>;
}

/// Progress callback for multi-symbol operations.
pub trait DownloadProgress: Send {
    /// Called when starting to fetch a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol fetch completes.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, result: &Result<(), DataError>);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl DownloadProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] {symbol}...", index + 1, total);
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        result: &Result<(), DataError>,
    ) {
        match result {
            Ok(()) => println!("  OK: {symbol}"),
            Err(e) => println!("  FAIL: {symbol}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nDone: {succeeded}/{total} stored, {failed} failed");
    }
}
