//! Integration tests: persisted portfolios round-tripped through the CSV
//! store and ranked over both windows.

use chrono::NaiveDate;
use folio_board::{
    export_overlay_csv, normalized_return, rank_from_store, ChartSeries, CsvPortfolioStore,
    JsonMetricsStore, MetricsStore, PortfolioStore, RankError, RankWindow,
};
use folio_core::{normalize, InstrumentStats, PricePoint, PriceSeries, ValuePoint, ValueSeries};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn series(values: &[f64]) -> ValueSeries {
    let base = d("2024-08-01");
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

#[test]
fn full_history_board_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvPortfolioStore::new(dir.path());

    store.put("alice", &series(&[10_000.0, 10_900.0])).unwrap();
    store.put("bob", &series(&[10_000.0, 12_500.0])).unwrap();
    store.put("carol", &series(&[10_000.0, 11_800.0])).unwrap();
    store.put("me", &series(&[10_000.0, 99_000.0])).unwrap();

    let board = rank_from_store(&store, "me", RankWindow::Full, 2).unwrap();

    let ids: Vec<&str> = board.iter().map(|e| e.user_id.as_str()).collect();
    assert_eq!(ids, vec!["bob", "carol"]);
    assert!((board[0].normalized_return - 1.25).abs() < 1e-12);
}

#[test]
fn weekly_board_can_disagree_with_full_history() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvPortfolioStore::new(dir.path());

    // Alice grew early and stalled; Bob lost early and is surging.
    store
        .put(
            "alice",
            &series(&[10_000.0, 14_000.0, 14_000.0, 14_000.0, 14_000.0, 14_000.0, 14_000.0]),
        )
        .unwrap();
    store
        .put(
            "bob",
            &series(&[10_000.0, 8_000.0, 8_200.0, 8_700.0, 9_100.0, 9_600.0, 10_400.0]),
        )
        .unwrap();

    let full = rank_from_store(&store, "me", RankWindow::Full, 1).unwrap();
    assert_eq!(full[0].user_id, "alice");

    let weekly = rank_from_store(&store, "me", RankWindow::Trailing(5), 1).unwrap();
    assert_eq!(weekly[0].user_id, "bob");
}

#[test]
fn corrupt_user_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvPortfolioStore::new(dir.path());

    store.put("alice", &series(&[10_000.0, 10_500.0])).unwrap();
    std::fs::write(dir.path().join("bob_portfolio.csv"), "garbage,,\n1,2,3\n").unwrap();

    let board = rank_from_store(&store, "me", RankWindow::Full, 10).unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].user_id, "alice");
}

#[test]
fn empty_store_is_no_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvPortfolioStore::new(dir.path());

    let err = rank_from_store(&store, "me", RankWindow::Full, 10).unwrap_err();
    assert!(matches!(err, RankError::NoCandidates));
}

#[test]
fn caller_comparison_against_the_board() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvPortfolioStore::new(dir.path());

    store.put("alice", &series(&[10_000.0, 11_000.0])).unwrap();
    store.put("me", &series(&[10_000.0, 11_500.0])).unwrap();

    let board = rank_from_store(&store, "me", RankWindow::Full, 3).unwrap();
    let mine = normalized_return(&store.get("me").unwrap(), RankWindow::Full).unwrap();

    // The caller out-performed everyone on the board but is not on it.
    assert!(board.iter().all(|e| e.normalized_return < mine));
    assert!(board.iter().all(|e| e.user_id != "me"));
}

#[test]
fn overlay_of_user_and_leaders() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvPortfolioStore::new(dir.path());

    store.put("alice", &series(&[10_000.0, 11_000.0])).unwrap();
    store.put("me", &series(&[10_000.0, 10_200.0])).unwrap();

    let board = rank_from_store(&store, "me", RankWindow::Full, 3).unwrap();

    let mut overlay = vec![ChartSeries::from_normalized(
        "me",
        &normalize(&store.get("me").unwrap()).unwrap(),
    )];
    for entry in &board {
        overlay.push(ChartSeries::from_normalized(
            entry.user_id.as_str(),
            &normalize(&store.get(&entry.user_id).unwrap()).unwrap(),
        ));
    }

    let csv = export_overlay_csv(&overlay).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Date,me,alice");
    assert_eq!(lines[1], "2024-08-01,1,1");
}

#[test]
fn metrics_store_upserts_recomputed_stats() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonMetricsStore::new(dir.path());

    let prices = PriceSeries::new(
        "SPY",
        vec![
            PricePoint { date: d("2024-08-01"), price: 100.0 },
            PricePoint { date: d("2024-08-02"), price: 110.0 },
            PricePoint { date: d("2024-08-05"), price: 99.0 },
        ],
    )
    .unwrap();

    let stats = InstrumentStats::compute(&prices).unwrap();
    store.upsert("SPY", &stats).unwrap();
    assert_eq!(store.get("SPY").unwrap().unwrap(), stats);

    // Recompute over a longer history and replace.
    let longer = PriceSeries::new(
        "SPY",
        vec![
            PricePoint { date: d("2024-08-01"), price: 100.0 },
            PricePoint { date: d("2024-08-02"), price: 110.0 },
            PricePoint { date: d("2024-08-05"), price: 99.0 },
            PricePoint { date: d("2024-08-06"), price: 103.0 },
        ],
    )
    .unwrap();
    let recomputed = InstrumentStats::compute(&longer).unwrap();
    store.upsert("SPY", &recomputed).unwrap();

    assert_eq!(store.get("SPY").unwrap().unwrap(), recomputed);
}
