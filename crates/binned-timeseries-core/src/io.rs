//! File-based construction of binned series.
//!
//! [`read`] parses a CSV or Parquet file with the corresponding Arrow
//! reader, maps caller-named columns onto the series builder's inputs
//! (start times, end times, or unit-bearing sizes), and hands the remaining
//! columns over as the measurement data.

pub mod error;
pub mod read;

pub use error::ReadError;
pub use read::{read, FileFormat, ReadOptions};
