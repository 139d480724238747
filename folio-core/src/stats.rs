//! Per-instrument statistics — pure functions over a single price series.
//!
//! Every metric is daily-unit arithmetic over the series' daily returns;
//! nothing here annualizes. Ratio denominators that would be zero (or
//! undefined) collapse the ratio to 0.0 instead of NaN.

use crate::domain::PriceSeries;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from statistics computation.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("need at least 2 observations to compute statistics (got {observations})")]
    InsufficientData { observations: usize },
}

/// Return/risk summary for one instrument. All fields are always populated;
/// a legitimate value of 0.0 is not an absence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentStats {
    pub cumulative_return: f64,
    pub average_daily_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
}

impl InstrumentStats {
    /// Compute all metrics from one adjusted-close series.
    ///
    /// Requires at least 2 observations (one daily return).
    pub fn compute(series: &PriceSeries) -> Result<Self, StatsError> {
        if series.len() < 2 {
            return Err(StatsError::InsufficientData {
                observations: series.len(),
            });
        }

        let returns = daily_returns(series);
        let points = series.points();
        let first = points[0].price;
        let last = points[points.len() - 1].price;

        let average_daily_return = mean(&returns);
        let volatility = sample_std(&returns);

        let sharpe_ratio = if volatility == 0.0 {
            0.0
        } else {
            average_daily_return / volatility
        };

        let negatives: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
        let downside = sample_std(&negatives);
        let sortino_ratio = if downside == 0.0 {
            0.0
        } else {
            average_daily_return / downside
        };

        Ok(Self {
            cumulative_return: (last - first) / first,
            average_daily_return,
            volatility,
            sharpe_ratio,
            sortino_ratio,
        })
    }
}

/// Daily returns `p[t] / p[t-1] - 1`; the first observation has none.
pub fn daily_returns(series: &PriceSeries) -> Vec<f64> {
    series
        .points()
        .windows(2)
        .map(|pair| pair[1].price / pair[0].price - 1.0)
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N−1). 0.0 for fewer than 2 values, which also
/// stands in for the undefined deviation of a singleton downside subset.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
