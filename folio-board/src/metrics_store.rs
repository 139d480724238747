//! Instrument metrics persistence — one JSON document per symbol.
//!
//! Upsert semantics: recomputing a symbol's statistics replaces the stored
//! document wholesale. Unknown symbols read back as `None` rather than an
//! error, because "not computed yet" is a normal state.

use folio_core::InstrumentStats;
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::StoreError;

/// Keyed store for per-symbol statistics.
pub trait MetricsStore: Send + Sync {
    fn upsert(&self, symbol: &str, stats: &InstrumentStats) -> Result<(), StoreError>;

    fn get(&self, symbol: &str) -> Result<Option<InstrumentStats>, StoreError>;

    /// Symbols with stored metrics, sorted.
    fn list_symbols(&self) -> Result<Vec<String>, StoreError>;
}

/// JSON-file-backed store: `{dir}/{SYMBOL}.json`.
pub struct JsonMetricsStore {
    dir: PathBuf,
}

impl JsonMetricsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.json"))
    }
}

impl MetricsStore for JsonMetricsStore {
    fn upsert(&self, symbol: &str, stats: &InstrumentStats) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(stats).map_err(|e| StoreError::Malformed {
            key: symbol.to_string(),
            reason: e.to_string(),
        })?;
        let path = self.symbol_path(symbol);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::Io(e)
        })
    }

    fn get(&self, symbol: &str) -> Result<Option<InstrumentStats>, StoreError> {
        let path = self.symbol_path(symbol);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };
        let stats = serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
            key: symbol.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(stats))
    }

    fn list_symbols(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut symbols = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}
