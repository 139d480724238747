//! Download orchestrator — coordinates multi-symbol fetches with progress reporting.

use super::provider::{DataError, DownloadProgress, PriceProvider};
use super::store::PriceStore;
use chrono::NaiveDate;

/// Download multiple symbols and persist each to the price store.
///
/// One bad symbol never aborts the batch; failures are collected in the
/// summary so the caller can report them all at once.
pub fn download_symbols(
    provider: &dyn PriceProvider,
    store: &dyn PriceStore,
    symbols: &[&str],
    start: NaiveDate,
    end: NaiveDate,
    progress: &dyn DownloadProgress,
) -> DownloadSummary {
    let total = symbols.len();
    let mut succeeded = 0;
    let mut failed = 0;
    let mut errors: Vec<(String, DataError)> = Vec::new();

    for (i, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, i, total);

        let result = download_single(provider, store, symbol, start, end);
        progress.on_complete(symbol, i, total, &result);

        match result {
            Ok(()) => succeeded += 1,
            Err(e) => {
                errors.push((symbol.to_string(), e));
                failed += 1;
            }
        }
    }

    progress.on_batch_complete(succeeded, failed, total);

    DownloadSummary {
        total,
        succeeded,
        failed,
        errors,
    }
}

/// Download a single symbol: fetch → store.
fn download_single(
    provider: &dyn PriceProvider,
    store: &dyn PriceStore,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), DataError> {
    let series = provider.fetch(symbol, start, end)?;
    if series.is_empty() {
        return Err(DataError::DataUnavailable {
            symbol: symbol.to_string(),
        });
    }
    store.write(&series)?;
    Ok(())
}

/// Summary of a batch download operation.
#[derive(Debug)]
pub struct DownloadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(String, DataError)>,
}

impl DownloadSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
