//! Price store: one flat adjusted-close series per symbol.
//!
//! The store is an injected capability — everything that needs prices takes
//! a `&dyn PriceStore`, so tests run against the in-memory fake and the
//! boundary service wires the CSV directory store.

use crate::data::provider::DataError;
use crate::domain::{PricePoint, PriceSeries};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Narrow persistence interface for per-symbol price series.
pub trait PriceStore: Send + Sync {
    /// Load the full series for a symbol, sorted by date ascending.
    fn load(&self, symbol: &str) -> Result<PriceSeries, DataError>;

    /// Persist a series, replacing any existing one for the same symbol.
    fn write(&self, series: &PriceSeries) -> Result<(), DataError>;

    /// Symbols with a backing series, sorted.
    fn list_symbols(&self) -> Result<Vec<String>, DataError>;
}

/// CSV-file-backed store: `{dir}/{SYMBOL}.csv`.
///
/// Reads locate the `Date` and `Adj Close` columns by header, so files
/// written by upstream downloaders with full OHLCV columns load unchanged.
/// Rows with an empty or non-numeric price cell are treated as absent dates.
/// Writes emit the two-column form and are atomic (tmp file + rename).
pub struct CsvPriceStore {
    dir: PathBuf,
}

impl CsvPriceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl PriceStore for CsvPriceStore {
    fn load(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let path = self.symbol_path(symbol);
        if !path.exists() {
            return Err(DataError::DataUnavailable {
                symbol: symbol.to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|e| DataError::Malformed {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

        let headers = reader.headers().map_err(|e| DataError::Malformed {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;
        let date_col = headers.iter().position(|h| h == "Date").ok_or_else(|| {
            DataError::Malformed {
                symbol: symbol.to_string(),
                reason: "missing 'Date' column".into(),
            }
        })?;
        let price_col = headers
            .iter()
            .position(|h| h == "Adj Close")
            .ok_or_else(|| DataError::Malformed {
                symbol: symbol.to_string(),
                reason: "missing 'Adj Close' column".into(),
            })?;

        let mut points = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| DataError::Malformed {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;
            let date_field = record.get(date_col).unwrap_or("");
            let date = NaiveDate::parse_from_str(date_field, "%Y-%m-%d").map_err(|_| {
                DataError::Malformed {
                    symbol: symbol.to_string(),
                    reason: format!("unparseable date '{date_field}'"),
                }
            })?;

            // An empty or non-numeric price cell means the date is absent,
            // not that the file is corrupt.
            let price = match record.get(price_col).unwrap_or("").parse::<f64>() {
                Ok(p) if p.is_finite() && p > 0.0 => p,
                _ => continue,
            };
            points.push(PricePoint { date, price });
        }

        points.sort_by_key(|p| p.date);
        PriceSeries::new(symbol, points).map_err(|source| DataError::InvalidSeries {
            symbol: symbol.to_string(),
            source,
        })
    }

    fn write(&self, series: &PriceSeries) -> Result<(), DataError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.symbol_path(series.symbol());
        let tmp_path = path.with_extension("csv.tmp");

        let mut writer = csv::Writer::from_path(&tmp_path).map_err(|e| DataError::Malformed {
            symbol: series.symbol().to_string(),
            reason: e.to_string(),
        })?;
        write_records(&mut writer, series).map_err(|e| DataError::Malformed {
            symbol: series.symbol().to_string(),
            reason: e.to_string(),
        })?;
        drop(writer);

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::Io(e)
        })
    }

    fn list_symbols(&self) -> Result<Vec<String>, DataError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut symbols = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}

fn write_records(
    writer: &mut csv::Writer<fs::File>,
    series: &PriceSeries,
) -> Result<(), csv::Error> {
    writer.write_record(["Date", "Adj Close"])?;
    for p in series.points() {
        writer.write_record([p.date.to_string(), p.price.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct InMemoryPriceStore {
    series: Mutex<HashMap<String, PriceSeries>>,
}

impl InMemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store directly, bypassing the trait.
    pub fn insert(&self, series: PriceSeries) {
        self.series
            .lock()
            .unwrap()
            .insert(series.symbol().to_string(), series);
    }
}

impl PriceStore for InMemoryPriceStore {
    fn load(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        self.series
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::DataUnavailable {
                symbol: symbol.to_string(),
            })
    }

    fn write(&self, series: &PriceSeries) -> Result<(), DataError> {
        self.insert(series.clone());
        Ok(())
    }

    fn list_symbols(&self) -> Result<Vec<String>, DataError> {
        let mut symbols: Vec<String> = self.series.lock().unwrap().keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_series(symbol: &str) -> PriceSeries {
        PriceSeries::new(
            symbol,
            vec![
                PricePoint { date: d("2024-08-01"), price: 100.25 },
                PricePoint { date: d("2024-08-02"), price: 101.5 },
                PricePoint { date: d("2024-08-05"), price: 99.875 },
            ],
        )
        .unwrap()
    }

    #[test]
    fn csv_write_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvPriceStore::new(dir.path());

        store.write(&sample_series("SPY")).unwrap();
        let loaded = store.load("SPY").unwrap();

        assert_eq!(loaded, sample_series("SPY"));
    }

    #[test]
    fn load_unknown_symbol_names_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvPriceStore::new(dir.path());

        let err = store.load("NOPE").unwrap_err();
        match err {
            DataError::DataUnavailable { symbol } => assert_eq!(symbol, "NOPE"),
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn load_tolerates_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AAPL.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
        writeln!(file, "2024-08-01,99.0,101.0,98.0,100.0,100.0,12345").unwrap();
        writeln!(file, "2024-08-02,100.0,102.0,99.0,101.0,101.0,23456").unwrap();

        let store = CsvPriceStore::new(dir.path());
        let series = store.load("AAPL").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].price, 100.0);
    }

    #[test]
    fn load_skips_rows_with_missing_price() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("XOM.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "Date,Adj Close").unwrap();
        writeln!(file, "2024-08-01,100.0").unwrap();
        writeln!(file, "2024-08-02,").unwrap();
        writeln!(file, "2024-08-05,NaN").unwrap();
        writeln!(file, "2024-08-06,102.0").unwrap();

        let store = CsvPriceStore::new(dir.path());
        let series = store.load("XOM").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[1].date, d("2024-08-06"));
    }

    #[test]
    fn load_rejects_missing_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BAD.csv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "Date,Close").unwrap();
        writeln!(file, "2024-08-01,100.0").unwrap();

        let store = CsvPriceStore::new(dir.path());
        let err = store.load("BAD").unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }));
    }

    #[test]
    fn written_values_keep_full_precision() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvPriceStore::new(dir.path());
        let series = PriceSeries::new(
            "PREC",
            vec![PricePoint { date: d("2024-08-01"), price: 100.123456789 }],
        )
        .unwrap();

        store.write(&series).unwrap();
        let loaded = store.load("PREC").unwrap();
        assert_eq!(loaded.points()[0].price, 100.123456789);
    }

    #[test]
    fn list_symbols_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvPriceStore::new(dir.path());
        store.write(&sample_series("SPY")).unwrap();
        store.write(&sample_series("AAPL")).unwrap();

        assert_eq!(store.list_symbols().unwrap(), vec!["AAPL", "SPY"]);
    }

    #[test]
    fn in_memory_store_roundtrip() {
        let store = InMemoryPriceStore::new();
        store.insert(sample_series("GOOG"));

        assert_eq!(store.load("GOOG").unwrap(), sample_series("GOOG"));
        assert!(matches!(
            store.load("MSFT"),
            Err(DataError::DataUnavailable { .. })
        ));
        assert_eq!(store.list_symbols().unwrap(), vec!["GOOG"]);
    }
}
