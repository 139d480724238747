//! Portfolio valuation — weighted, normalized price growth from a start value.
//!
//! Each symbol column contributes `(price / first_price) * weight * start`,
//! rounded to 3 decimals per contribution, and the contributions are summed
//! row-wise. Rounding happens before the cross-symbol sum; the order is part
//! of the output contract because it affects penny-level values.

use crate::domain::{PriceMatrix, ValuePoint, ValueSeries};
use thiserror::Error;

/// Errors from portfolio valuation.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// Contract violation: one weight per matrix column, in column order.
    #[error("allocation count ({actual}) does not match matrix column count ({expected})")]
    AllocationMismatch { expected: usize, actual: usize },

    /// The matrix has no rows (no common dates survived the join).
    #[error("not enough aligned observations to value the portfolio")]
    InsufficientData,
}

/// Value a portfolio over the matrix's date axis.
///
/// `allocations` must align with `matrix` column order and is used as given:
/// weights that do not sum to 1.0 are the boundary layer's problem, and the
/// first output row equals `start_value` exactly when they do. The matrix is
/// not modified; the output is a fresh series.
pub fn value_portfolio(
    matrix: &PriceMatrix,
    allocations: &[f64],
    start_value: f64,
) -> Result<ValueSeries, ValuationError> {
    if allocations.len() != matrix.symbol_count() {
        return Err(ValuationError::AllocationMismatch {
            expected: matrix.symbol_count(),
            actual: allocations.len(),
        });
    }
    if matrix.is_empty() {
        return Err(ValuationError::InsufficientData);
    }

    let mut totals = vec![0.0_f64; matrix.row_count()];
    for (index, &weight) in allocations.iter().enumerate() {
        let column = matrix.column(index);
        let base = column[0];
        for (row, &price) in column.iter().enumerate() {
            totals[row] += round3(price / base * weight * start_value);
        }
    }

    let points = matrix
        .dates()
        .iter()
        .zip(totals)
        .map(|(&date, value)| ValuePoint { date, value })
        .collect();
    Ok(ValueSeries::new(points))
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn matrix(symbols: &[&str], dates: &[&str], columns: Vec<Vec<f64>>) -> PriceMatrix {
        PriceMatrix::from_columns(
            symbols.iter().map(|s| s.to_string()).collect(),
            dates.iter().map(|s| d(s)).collect(),
            columns,
        )
        .unwrap()
    }

    #[test]
    fn two_symbols_identical_growth() {
        // Both symbols gain 10%, so the whole portfolio scales by 1.10.
        let m = matrix(
            &["GOOG", "AAPL"],
            &["2024-01-02", "2024-01-03"],
            vec![vec![100.0, 110.0], vec![50.0, 55.0]],
        );
        let series = value_portfolio(&m, &[0.5, 0.5], 10_000.0).unwrap();

        assert_eq!(series.values(), vec![10_000.0, 11_000.0]);
    }

    #[test]
    fn first_row_equals_start_value_when_weights_sum_to_one() {
        let m = matrix(
            &["A", "B", "C"],
            &["2024-01-02", "2024-01-03"],
            vec![vec![3.0, 4.0], vec![7.0, 5.0], vec![11.0, 13.0]],
        );
        let series = value_portfolio(&m, &[0.4, 0.3, 0.3], 10_000.0).unwrap();

        assert!((series.first().unwrap().value - 10_000.0).abs() < 1e-3);
    }

    #[test]
    fn weights_are_not_renormalized() {
        let m = matrix(&["A"], &["2024-01-02"], vec![vec![100.0]]);
        let series = value_portfolio(&m, &[0.5], 10_000.0).unwrap();

        // Half a portfolio stays half a portfolio.
        assert_eq!(series.values(), vec![5_000.0]);
    }

    #[test]
    fn contributions_round_before_summation() {
        // Per-symbol contribution 10000 * 0.5 * (1/3) = 1666.666...,
        // rounded to 1666.667 each before summing → 3333.334 (not 3333.333).
        let m = matrix(
            &["A", "B"],
            &["2024-01-02", "2024-01-03"],
            vec![vec![3.0, 1.0], vec![3.0, 1.0]],
        );
        let series = value_portfolio(&m, &[0.5, 0.5], 10_000.0).unwrap();

        assert!((series.values()[1] - 3_333.334).abs() < 1e-9);
    }

    #[test]
    fn allocation_mismatch_fails_fast() {
        let m = matrix(&["A", "B"], &["2024-01-02"], vec![vec![1.0], vec![2.0]]);
        let err = value_portfolio(&m, &[1.0], 10_000.0).unwrap_err();
        match err {
            ValuationError::AllocationMismatch { expected, actual } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected AllocationMismatch, got {other:?}"),
        }
    }

    #[test]
    fn empty_matrix_is_insufficient_data() {
        let m = PriceMatrix::empty(vec!["A".into(), "B".into()]);
        let err = value_portfolio(&m, &[0.5, 0.5], 10_000.0).unwrap_err();
        assert!(matches!(err, ValuationError::InsufficientData));
    }

    #[test]
    fn output_dates_follow_matrix_rows() {
        let m = matrix(
            &["A"],
            &["2024-01-02", "2024-01-05"],
            vec![vec![100.0, 150.0]],
        );
        let series = value_portfolio(&m, &[1.0], 1_000.0).unwrap();

        let dates: Vec<NaiveDate> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d("2024-01-02"), d("2024-01-05")]);
        assert_eq!(series.values(), vec![1_000.0, 1_500.0]);
    }
}
