//! Per-symbol price series and portfolio value series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily observation: calendar date and adjusted close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// One point of a portfolio value series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Validation errors for price series construction.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("dates must be strictly increasing (duplicate or out-of-order date: {date})")]
    OutOfOrder { date: NaiveDate },

    #[error("price must be positive and finite (got {price} on {date})")]
    InvalidPrice { date: NaiveDate, price: f64 },
}

/// Adjusted-close history for one symbol.
///
/// Invariants, enforced at construction: dates strictly increasing (no
/// duplicates), every price positive and finite. Immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a validated series. Points must already be in ascending date order.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::OutOfOrder { date: pair[1].date });
            }
        }
        for p in &points {
            if !p.price.is_finite() || p.price <= 0.0 {
                return Err(SeriesError::InvalidPrice {
                    date: p.date,
                    price: p.price,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Portfolio value over time, one entry per matrix row used to build it.
///
/// Produced by valuation (or read back from the portfolio store); never
/// mutated, only superseded by recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSeries {
    points: Vec<ValuePoint>,
}

impl ValueSeries {
    pub fn new(points: Vec<ValuePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ValuePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&ValuePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&ValuePoint> {
        self.points.last()
    }

    /// Values only, in row order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}
