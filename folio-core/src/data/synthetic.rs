//! Synthetic price series for offline development and tests.
//!
//! Produces a deterministic random walk per symbol: the RNG is seeded from
//! the symbol name, so repeated runs generate identical data.

use crate::domain::{PricePoint, PriceSeries};
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a synthetic adjusted-close series from `start` to `end`.
///
/// Weekends are skipped so the data resembles a trading calendar. Prices are
/// a bounded random walk from 100.0 and therefore always positive.
pub fn synthetic_series(symbol: &str, start: NaiveDate, end: NaiveDate) -> PriceSeries {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut points = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        price *= 1.0 + daily_return;
        points.push(PricePoint { date: current, price });
        current += chrono::Duration::days(1);
    }

    PriceSeries::new(symbol, points).expect("synthetic walk is ordered and positive")
}
