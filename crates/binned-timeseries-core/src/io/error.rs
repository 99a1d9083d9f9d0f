//! Errors raised while loading a binned series from a file.

use std::path::PathBuf;

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use snafu::Snafu;

use crate::series::error::BinnedSeriesError;
use crate::time::format::{TimeColumnError, TimeScale};

/// Errors from [`crate::io::read`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReadError {
    /// The format name does not map to a supported reader.
    #[snafu(display("Unknown file format {name:?} (expected \"csv\" or \"parquet\")"))]
    UnknownFormat {
        /// The unrecognized format name.
        name: String,
    },

    /// Both or neither of the end/size columns were named; the bins cannot
    /// be closed unambiguously.
    #[snafu(display(
        "Exactly one of 'time_bin_end_column' and 'time_bin_size_column' must be specified"
    ))]
    EndOrSizeColumn,

    /// A size column is unit-less without an accompanying unit.
    #[snafu(display("'time_bin_size_unit' is required when 'time_bin_size_column' is used"))]
    MissingSizeUnit,

    /// A named column is absent from the parsed data.
    #[snafu(display("Column {column} not found in the input data"))]
    ColumnNotFound {
        /// The missing column name.
        column: String,
    },

    /// The declared time scale is not supported for loading.
    #[snafu(display("Unsupported time scale {scale:?}; only UTC is supported"))]
    UnsupportedTimeScale {
        /// The declared scale.
        scale: TimeScale,
    },

    /// The size column is not numeric.
    #[snafu(display("Size column {column} must be numeric, got {datatype}"))]
    NonNumericSizeColumn {
        /// The size column name.
        column: String,
        /// The Arrow type that was found.
        datatype: DataType,
    },

    /// The size column contains a null.
    #[snafu(display("Null value at row {row} of size column {column}"))]
    NullSizeValue {
        /// The size column name.
        column: String,
        /// Zero-based row of the null.
        row: usize,
    },

    /// A size value cannot be represented as a duration in the given unit.
    #[snafu(display("Size value {value} at row {row} of column {column} is out of range"))]
    SizeOutOfRange {
        /// The size column name.
        column: String,
        /// Zero-based row of the value.
        row: usize,
        /// The offending value.
        value: f64,
    },

    /// Filesystem error opening or reading the file.
    #[snafu(display("I/O error reading {}: {source}", path.display()))]
    Io {
        /// Path of the file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Arrow error while parsing or assembling the table.
    #[snafu(display("Arrow error while reading the table: {source}"))]
    Arrow {
        /// The underlying Arrow error.
        source: ArrowError,
    },

    /// Parquet error while opening or decoding the file.
    #[snafu(display("Parquet read error: {source}"))]
    Parquet {
        /// The underlying Parquet error.
        source: ParquetError,
    },

    /// Converting a named time column failed.
    #[snafu(display("Time column conversion failed: {source}"))]
    TimeColumn {
        /// The underlying conversion error.
        source: TimeColumnError,
    },

    /// The normalizer rejected the derived inputs.
    #[snafu(display("Binned series construction failed: {source}"))]
    Series {
        /// The underlying construction error.
        source: BinnedSeriesError,
    },
}
