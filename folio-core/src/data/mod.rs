//! Price data access: store traits, matrix assembly, and acquisition.

pub mod download;
pub mod join;
pub mod provider;
pub mod store;
pub mod synthetic;
pub mod yahoo;

pub use download::{download_symbols, DownloadSummary};
pub use join::{date_range, load_matrix};
pub use provider::{DataError, DownloadProgress, PriceProvider, StdoutProgress};
pub use store::{CsvPriceStore, InMemoryPriceStore, PriceStore};
pub use synthetic::synthetic_series;
pub use yahoo::YahooProvider;
