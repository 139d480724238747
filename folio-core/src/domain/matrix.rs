//! Date-aligned price matrix over a symbol set.
//!
//! Columns follow the requested symbol order (callers align allocation
//! weights by that order); rows are ascending dates. Every cell is defined:
//! dates missing for any symbol are dropped before the matrix exists.

use chrono::NaiveDate;
use thiserror::Error;

/// Validation errors for matrix construction.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("column '{symbol}' has {actual} rows, expected {expected}")]
    Ragged {
        symbol: String,
        expected: usize,
        actual: usize,
    },

    #[error("row dates must be strictly increasing (offending date: {date})")]
    OutOfOrder { date: NaiveDate },

    #[error("matrix cell for '{symbol}' on {date} must be positive and finite (got {price})")]
    InvalidPrice {
        symbol: String,
        date: NaiveDate,
        price: f64,
    },

    #[error("symbol count ({symbols}) does not match column count ({columns})")]
    ColumnMismatch { symbols: usize, columns: usize },
}

/// Rectangular grid of adjusted closes: one column per symbol, one row per date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatrix {
    symbols: Vec<String>,
    dates: Vec<NaiveDate>,
    /// Column-major: `columns[c][r]` is the price of `symbols[c]` on `dates[r]`.
    columns: Vec<Vec<f64>>,
}

impl PriceMatrix {
    /// Build a validated matrix from column-major data.
    pub fn from_columns(
        symbols: Vec<String>,
        dates: Vec<NaiveDate>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self, MatrixError> {
        if symbols.len() != columns.len() {
            return Err(MatrixError::ColumnMismatch {
                symbols: symbols.len(),
                columns: columns.len(),
            });
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(MatrixError::OutOfOrder { date: pair[1] });
            }
        }
        for (symbol, column) in symbols.iter().zip(&columns) {
            if column.len() != dates.len() {
                return Err(MatrixError::Ragged {
                    symbol: symbol.clone(),
                    expected: dates.len(),
                    actual: column.len(),
                });
            }
            for (&date, &price) in dates.iter().zip(column) {
                if !price.is_finite() || price <= 0.0 {
                    return Err(MatrixError::InvalidPrice {
                        symbol: symbol.clone(),
                        date,
                        price,
                    });
                }
            }
        }
        Ok(Self {
            symbols,
            dates,
            columns,
        })
    }

    /// A matrix with the given columns and no rows (no common dates survived).
    pub fn empty(symbols: Vec<String>) -> Self {
        let columns = vec![Vec::new(); symbols.len()];
        Self {
            symbols,
            dates: Vec::new(),
            columns,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    /// True when the inner join eliminated every row.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Prices for the column at `index`, in row order.
    pub fn column(&self, index: usize) -> &[f64] {
        &self.columns[index]
    }

    /// Deterministic BLAKE3 hash over symbols, dates, and prices.
    ///
    /// Two matrices built from the same store contents for the same
    /// (symbol set, date range) hash identically, so this doubles as an
    /// external cache key.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for symbol in &self.symbols {
            hasher.update(symbol.as_bytes());
            hasher.update(b"\0");
        }
        for date in &self.dates {
            hasher.update(date.to_string().as_bytes());
        }
        for column in &self.columns {
            for price in column {
                hasher.update(&price.to_le_bytes());
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn two_by_two() -> PriceMatrix {
        PriceMatrix::from_columns(
            vec!["GOOG".into(), "AAPL".into()],
            vec![d("2024-01-02"), d("2024-01-03")],
            vec![vec![100.0, 110.0], vec![50.0, 55.0]],
        )
        .unwrap()
    }

    #[test]
    fn accessors() {
        let m = two_by_two();
        assert_eq!(m.symbol_count(), 2);
        assert_eq!(m.row_count(), 2);
        assert!(!m.is_empty());
        assert_eq!(m.symbols(), &["GOOG".to_string(), "AAPL".to_string()]);
        assert_eq!(m.column(0), &[100.0, 110.0]);
        assert_eq!(m.column(1), &[50.0, 55.0]);
    }

    #[test]
    fn ragged_columns_rejected() {
        let result = PriceMatrix::from_columns(
            vec!["GOOG".into(), "AAPL".into()],
            vec![d("2024-01-02"), d("2024-01-03")],
            vec![vec![100.0, 110.0], vec![50.0]],
        );
        assert!(matches!(result, Err(MatrixError::Ragged { .. })));
    }

    #[test]
    fn nan_cell_rejected() {
        let result = PriceMatrix::from_columns(
            vec!["GOOG".into()],
            vec![d("2024-01-02")],
            vec![vec![f64::NAN]],
        );
        assert!(matches!(result, Err(MatrixError::InvalidPrice { .. })));
    }

    #[test]
    fn out_of_order_dates_rejected() {
        let result = PriceMatrix::from_columns(
            vec!["GOOG".into()],
            vec![d("2024-01-03"), d("2024-01-02")],
            vec![vec![100.0, 101.0]],
        );
        assert!(matches!(result, Err(MatrixError::OutOfOrder { .. })));
    }

    #[test]
    fn empty_matrix_has_columns_but_no_rows() {
        let m = PriceMatrix::empty(vec!["GOOG".into(), "AAPL".into()]);
        assert!(m.is_empty());
        assert_eq!(m.symbol_count(), 2);
        assert_eq!(m.row_count(), 0);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(two_by_two().fingerprint(), two_by_two().fingerprint());
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let other = PriceMatrix::from_columns(
            vec!["GOOG".into(), "AAPL".into()],
            vec![d("2024-01-02"), d("2024-01-03")],
            vec![vec![100.0, 110.0], vec![50.0, 56.0]],
        )
        .unwrap();
        assert_ne!(two_by_two().fingerprint(), other.fingerprint());
    }
}
