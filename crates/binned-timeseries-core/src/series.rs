//! Binned series construction and derived views.
//!
//! [`builder::BinnedTimeSeriesBuilder`] reconciles the many partial ways bin
//! boundaries can be specified into the canonical `(start, size)` column
//! pair; [`binned::BinnedTimeSeries`] owns the materialized table and
//! exposes the derived bin views and the column-subset rule.

pub mod binned;
pub mod builder;
pub mod error;

pub use binned::{BinnedTimeSeries, Selection, LOOKUP_INDEX_KEY, TIME_BIN_SIZE, TIME_BIN_START};
pub use builder::BinnedTimeSeriesBuilder;
pub use error::BinnedSeriesError;
