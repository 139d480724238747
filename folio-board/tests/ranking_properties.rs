//! Property tests for ranking invariants.
//!
//! 1. Trailing windows at least as long as the series behave like the full
//!    window (graceful degradation, never an error)
//! 2. The board is always sorted best-first, bounded by top_k, and never
//!    contains the excluded user

use chrono::NaiveDate;
use folio_board::{normalized_return, rank, RankWindow};
use folio_core::{ValuePoint, ValueSeries};
use proptest::prelude::*;
use std::collections::HashMap;

fn series(values: &[f64]) -> ValueSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    ValueSeries::new(
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| ValuePoint {
                date: base + chrono::Duration::days(i as i64),
                value,
            })
            .collect(),
    )
}

fn arb_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..100_000.0_f64, 1..30)
}

proptest! {
    #[test]
    fn oversized_trailing_window_equals_full(values in arb_values(), extra in 0..10_usize) {
        let s = series(&values);
        let window = RankWindow::Trailing(values.len() + extra);
        prop_assert_eq!(
            normalized_return(&s, window),
            normalized_return(&s, RankWindow::Full)
        );
    }

    #[test]
    fn board_is_sorted_bounded_and_excludes_caller(
        user_values in prop::collection::vec(arb_values(), 2..8),
        top_k in 0..10_usize,
    ) {
        let map: HashMap<String, ValueSeries> = user_values
            .iter()
            .enumerate()
            .map(|(i, values)| (format!("user{i}"), series(values)))
            .collect();

        let board = rank(&map, "user0", RankWindow::Full, top_k).unwrap();

        prop_assert!(board.len() <= top_k);
        prop_assert!(board.iter().all(|e| e.user_id != "user0"));
        for pair in board.windows(2) {
            prop_assert!(pair[0].normalized_return >= pair[1].normalized_return);
        }
    }
}
