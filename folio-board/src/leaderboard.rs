//! Leaderboard ranking — top performers by normalized return.
//!
//! Each user's persisted value series reduces to a single normalized return
//! (last value / first value) over the chosen window, the calling user is
//! excluded, and the best `top_k` survive. Ordering is deterministic: return
//! descending, ties broken by user id ascending. Per-user reduction is
//! independent, so the candidate set is processed in parallel.

use folio_core::ValueSeries;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::store::{PortfolioStore, StoreError};

/// Observation window for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankWindow {
    /// The user's whole stored history.
    Full,
    /// The last `n` observations; shorter series are used whole.
    Trailing(usize),
}

/// A single ranked competitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub normalized_return: f64,
}

/// Errors from ranking.
#[derive(Debug, Error)]
pub enum RankError {
    /// Nobody left to rank once the caller is excluded.
    #[error("no eligible competitors")]
    NoCandidates,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Normalized return of a series over a window: last value / first value.
///
/// `None` when the (windowed) series is empty or the ratio is not finite —
/// such series cannot be ranked.
pub fn normalized_return(series: &ValueSeries, window: RankWindow) -> Option<f64> {
    let points = series.points();
    let windowed = match window {
        RankWindow::Full => points,
        RankWindow::Trailing(n) => {
            let start = points.len().saturating_sub(n);
            &points[start..]
        }
    };
    let first = windowed.first()?.value;
    let last = windowed.last()?.value;
    let ratio = last / first;
    ratio.is_finite().then_some(ratio)
}

/// Rank every user except `exclude`, best first, at most `top_k` entries.
///
/// Users whose series cannot produce a finite normalized return are skipped;
/// `NoCandidates` fires only when the map is empty after exclusion.
pub fn rank(
    series_by_user: &HashMap<String, ValueSeries>,
    exclude: &str,
    window: RankWindow,
    top_k: usize,
) -> Result<Vec<LeaderboardEntry>, RankError> {
    let candidates: Vec<(&String, &ValueSeries)> = series_by_user
        .iter()
        .filter(|(user_id, _)| user_id.as_str() != exclude)
        .collect();
    if candidates.is_empty() {
        return Err(RankError::NoCandidates);
    }

    let mut entries: Vec<LeaderboardEntry> = candidates
        .par_iter()
        .filter_map(|(user_id, series)| {
            normalized_return(series, window).map(|normalized_return| LeaderboardEntry {
                user_id: (*user_id).clone(),
                normalized_return,
            })
        })
        .collect();

    // Best return first; equal returns order by user id so the board is
    // reproducible run to run.
    entries.sort_by(|a, b| {
        b.normalized_return
            .partial_cmp(&a.normalized_return)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    entries.truncate(top_k);
    Ok(entries)
}

/// Rank directly from a portfolio store, loading every persisted user.
///
/// A user whose stored file fails to load is skipped with a warning rather
/// than failing the whole board.
pub fn rank_from_store(
    store: &dyn PortfolioStore,
    exclude: &str,
    window: RankWindow,
    top_k: usize,
) -> Result<Vec<LeaderboardEntry>, RankError> {
    let mut series_by_user = HashMap::new();
    for user_id in store.list_users()? {
        if user_id == exclude {
            continue;
        }
        match store.get(&user_id) {
            Ok(series) => {
                series_by_user.insert(user_id, series);
            }
            Err(e) => {
                eprintln!("WARNING: skipping unreadable portfolio for '{user_id}': {e}");
            }
        }
    }
    if series_by_user.is_empty() {
        return Err(RankError::NoCandidates);
    }
    rank(&series_by_user, exclude, window, top_k)
}
