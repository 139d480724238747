//! Matrix assembly: time alignment of heterogeneous per-symbol histories.
//!
//! Each symbol's series is left-joined onto the candidate date axis, then
//! every row with any absent value is dropped — an inner join over the whole
//! symbol set, achieved incrementally. Missing dates are never imputed.

use crate::data::provider::DataError;
use crate::data::store::PriceStore;
use crate::domain::PriceMatrix;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Inclusive calendar-day axis from `start` to `end`.
///
/// The axis intentionally includes non-trading days; the join below drops
/// them because no symbol has a price there.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current += chrono::Duration::days(1);
    }
    dates
}

/// Load a date-aligned price matrix for `symbols` restricted to `dates`.
///
/// Column order is the requested symbol order — callers align allocation
/// weights by it, so this is a contract, not an implementation detail.
/// A symbol with no backing series fails with `DataUnavailable` naming it.
/// If no date survives the join, the result is an empty matrix; downstream
/// valuation reports that as insufficient data rather than failing here.
pub fn load_matrix(
    store: &dyn PriceStore,
    symbols: &[String],
    dates: &[NaiveDate],
) -> Result<PriceMatrix, DataError> {
    if symbols.is_empty() {
        return Err(DataError::NoSymbols);
    }

    // Candidate axis: sorted, deduplicated.
    let axis: Vec<NaiveDate> = dates.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

    // One date → price lookup per symbol, in requested order.
    let mut lookups: Vec<HashMap<NaiveDate, f64>> = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let series = store.load(symbol)?;
        lookups.push(series.points().iter().map(|p| (p.date, p.price)).collect());
    }

    // Keep only rows where every symbol has a price.
    let mut kept_dates = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); symbols.len()];
    for date in axis {
        if lookups.iter().all(|lookup| lookup.contains_key(&date)) {
            kept_dates.push(date);
            for (column, lookup) in columns.iter_mut().zip(&lookups) {
                column.push(lookup[&date]);
            }
        }
    }

    Ok(PriceMatrix::from_columns(
        symbols.to_vec(),
        kept_dates,
        columns,
    )?)
}
