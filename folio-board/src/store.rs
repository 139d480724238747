//! Portfolio value persistence — a narrow key-value store per user.
//!
//! The ranker only ever sees the `PortfolioStore` trait, so the storage
//! medium is swappable: a CSV directory in production, a map in tests.
//! File shape: exactly two columns, `Date,Portfolio`, ISO-8601 dates, values
//! at full round-trip precision. Writes are atomic (tmp file + rename).

use chrono::NaiveDate;
use folio_core::{ValuePoint, ValueSeries};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no stored portfolio for user '{user_id}'")]
    UnknownUser { user_id: String },

    #[error("malformed record for '{key}': {reason}")]
    Malformed { key: String, reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Narrow key-value interface for persisted portfolio value series.
pub trait PortfolioStore: Send + Sync {
    /// Persist a user's series, replacing any existing one.
    fn put(&self, user_id: &str, series: &ValueSeries) -> Result<(), StoreError>;

    /// Load a user's series.
    fn get(&self, user_id: &str) -> Result<ValueSeries, StoreError>;

    /// Users with a stored series, sorted.
    fn list_users(&self) -> Result<Vec<String>, StoreError>;
}

const FILE_SUFFIX: &str = "_portfolio.csv";

/// CSV-file-backed store: `{dir}/{user_id}_portfolio.csv`.
pub struct CsvPortfolioStore {
    dir: PathBuf,
}

impl CsvPortfolioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn user_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{user_id}{FILE_SUFFIX}"))
    }
}

impl PortfolioStore for CsvPortfolioStore {
    fn put(&self, user_id: &str, series: &ValueSeries) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.user_path(user_id);
        let tmp_path = path.with_extension("csv.tmp");

        let mut writer = csv::Writer::from_path(&tmp_path).map_err(|e| StoreError::Malformed {
            key: user_id.to_string(),
            reason: e.to_string(),
        })?;
        write_records(&mut writer, series).map_err(|e| StoreError::Malformed {
            key: user_id.to_string(),
            reason: e.to_string(),
        })?;
        drop(writer);

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::Io(e)
        })
    }

    fn get(&self, user_id: &str) -> Result<ValueSeries, StoreError> {
        let path = self.user_path(user_id);
        if !path.exists() {
            return Err(StoreError::UnknownUser {
                user_id: user_id.to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|e| StoreError::Malformed {
            key: user_id.to_string(),
            reason: e.to_string(),
        })?;

        let headers = reader.headers().map_err(|e| StoreError::Malformed {
            key: user_id.to_string(),
            reason: e.to_string(),
        })?;
        if headers.iter().collect::<Vec<_>>() != ["Date", "Portfolio"] {
            return Err(StoreError::Malformed {
                key: user_id.to_string(),
                reason: format!("expected header 'Date,Portfolio', got '{}'", headers.iter().collect::<Vec<_>>().join(",")),
            });
        }

        let mut points = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| StoreError::Malformed {
                key: user_id.to_string(),
                reason: e.to_string(),
            })?;
            let date_field = record.get(0).unwrap_or("");
            let value_field = record.get(1).unwrap_or("");
            let date = NaiveDate::parse_from_str(date_field, "%Y-%m-%d").map_err(|_| {
                StoreError::Malformed {
                    key: user_id.to_string(),
                    reason: format!("unparseable date '{date_field}'"),
                }
            })?;
            let value = value_field.parse::<f64>().map_err(|_| StoreError::Malformed {
                key: user_id.to_string(),
                reason: format!("unparseable value '{value_field}'"),
            })?;
            points.push(ValuePoint { date, value });
        }

        Ok(ValueSeries::new(points))
    }

    fn list_users(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut users = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(user) = name.strip_suffix(FILE_SUFFIX) {
                users.push(user.to_string());
            }
        }
        users.sort();
        Ok(users)
    }
}

fn write_records(
    writer: &mut csv::Writer<fs::File>,
    series: &ValueSeries,
) -> Result<(), csv::Error> {
    writer.write_record(["Date", "Portfolio"])?;
    for p in series.points() {
        writer.write_record([p.date.to_string(), p.value.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct InMemoryPortfolioStore {
    series: Mutex<HashMap<String, ValueSeries>>,
}

impl InMemoryPortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PortfolioStore for InMemoryPortfolioStore {
    fn put(&self, user_id: &str, series: &ValueSeries) -> Result<(), StoreError> {
        self.series
            .lock()
            .unwrap()
            .insert(user_id.to_string(), series.clone());
        Ok(())
    }

    fn get(&self, user_id: &str) -> Result<ValueSeries, StoreError> {
        self.series
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::UnknownUser {
                user_id: user_id.to_string(),
            })
    }

    fn list_users(&self) -> Result<Vec<String>, StoreError> {
        let mut users: Vec<String> = self.series.lock().unwrap().keys().cloned().collect();
        users.sort();
        Ok(users)
    }
}
