//! Output adapters — reshape series for external persistence and rendering.
//!
//! Nothing here computes; these functions only change shape. Values pass
//! through at full precision (whatever rounding upstream applied is all the
//! rounding there is), and row order is always preserved.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use folio_core::{NormalizedSeries, ValueSeries};
use serde::Serialize;
use std::collections::BTreeSet;

/// One date-indexed row of a value series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub value: f64,
}

/// Reshape a value series into date-indexed rows.
pub fn to_rows(series: &ValueSeries) -> Vec<SeriesRow> {
    series
        .points()
        .iter()
        .map(|p| SeriesRow { date: p.date, value: p.value })
        .collect()
}

/// A labelled series in the shape rendering consumers accept: a title plus
/// ordered (x, y) pairs. Several of these make an overlay (user vs. leaders
/// vs. benchmark).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl ChartSeries {
    pub fn from_values(label: impl Into<String>, series: &ValueSeries) -> Self {
        Self {
            label: label.into(),
            points: series.points().iter().map(|p| (p.date, p.value)).collect(),
        }
    }

    pub fn from_normalized(label: impl Into<String>, series: &NormalizedSeries) -> Self {
        Self {
            label: label.into(),
            points: series.points().iter().map(|p| (p.date, p.value)).collect(),
        }
    }
}

/// Export one value series as `Date,Portfolio` CSV.
pub fn export_series_csv(series: &ValueSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["Date", "Portfolio"])?;
    for p in series.points() {
        wtr.write_record([p.date.to_string(), p.value.to_string()])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export several labelled series as one wide CSV: `Date` plus one column
/// per label. The date axis is the union of all series' dates; a series
/// without a value on some date gets an empty cell.
pub fn export_overlay_csv(series_list: &[ChartSeries]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["Date".to_string()];
    header.extend(series_list.iter().map(|s| s.label.clone()));
    wtr.write_record(&header)?;

    let axis: BTreeSet<NaiveDate> = series_list
        .iter()
        .flat_map(|s| s.points.iter().map(|&(date, _)| date))
        .collect();

    for date in axis {
        let mut row = vec![date.to_string()];
        for series in series_list {
            let cell = series
                .points
                .iter()
                .find(|&&(d, _)| d == date)
                .map(|&(_, v)| v.to_string())
                .unwrap_or_default();
            row.push(cell);
        }
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
