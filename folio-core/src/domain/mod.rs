//! Domain value types: price series, value series, and the aligned price matrix.
//!
//! Everything here is an immutable value object. Construction validates the
//! invariants (ordering, positivity, rectangularity); after that the types
//! only expose read access.

pub mod matrix;
pub mod series;

pub use matrix::{MatrixError, PriceMatrix};
pub use series::{PricePoint, PriceSeries, SeriesError, ValuePoint, ValueSeries};
