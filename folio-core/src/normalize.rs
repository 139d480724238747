//! Series normalization — rescale any series so its first observation is 1.0.
//!
//! Normalized series are the common currency for cross-series comparison:
//! a user's portfolio against the leaders, or against a benchmark symbol.

use crate::domain::{PriceSeries, ValuePoint, ValueSeries};
use thiserror::Error;

/// Errors from normalization.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("cannot normalize an empty series")]
    EmptySeries,
}

/// A series divided through by its first value; the first entry is exactly 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    points: Vec<ValuePoint>,
}

impl NormalizedSeries {
    pub fn points(&self) -> &[ValuePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// View the normalized points as a value series (e.g. to persist or re-shape).
    pub fn to_value_series(&self) -> ValueSeries {
        ValueSeries::new(self.points.clone())
    }
}

/// Normalize a value series. Idempotent: normalizing a normalized series is a no-op.
pub fn normalize(series: &ValueSeries) -> Result<NormalizedSeries, NormalizeError> {
    normalize_points(series.points())
}

/// Normalize an instrument's price series (benchmark overlays).
pub fn normalize_prices(series: &PriceSeries) -> Result<NormalizedSeries, NormalizeError> {
    let points: Vec<ValuePoint> = series
        .points()
        .iter()
        .map(|p| ValuePoint { date: p.date, value: p.price })
        .collect();
    normalize_points(&points)
}

fn normalize_points(points: &[ValuePoint]) -> Result<NormalizedSeries, NormalizeError> {
    let first = points.first().ok_or(NormalizeError::EmptySeries)?.value;
    let points = points
        .iter()
        .map(|p| ValuePoint { date: p.date, value: p.value / first })
        .collect();
    Ok(NormalizedSeries { points })
}
