//! Errors raised while constructing or selecting from a binned series.
//!
//! All of these are synchronous construction-time failures: either the
//! series materializes completely or one of these is returned before any
//! column is committed. Variants carry both sides of every mismatch so the
//! message alone pinpoints the inconsistency.

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use snafu::Snafu;

use crate::time::format::TimeColumnError;

/// Errors from binned-series construction and column selection.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BinnedSeriesError {
    /// A bin column was supplied both inside the data table and as a
    /// builder argument, and the two cannot be reconciled.
    #[snafu(display("'{column}' has been given both in the table and as an argument"))]
    AmbiguousColumn {
        /// The doubly-specified column name.
        column: String,
    },

    /// No start was given, either as an argument or as a table column.
    #[snafu(display("'time_bin_start' has not been specified"))]
    MissingStart,

    /// Neither a size nor an end was given; bins cannot be closed.
    #[snafu(display("Either 'time_bin_size' or 'time_bin_end' should be specified"))]
    MissingEndOrSize,

    /// A scalar start describes contiguous bins from one origin, which
    /// requires a size to lay them out.
    #[snafu(display("'time_bin_start' is scalar, so 'time_bin_size' is required"))]
    ScalarStartNeedsSize,

    /// With a scalar start, a scalar size, and no data, the bin count
    /// cannot be inferred.
    #[snafu(display(
        "'time_bin_size' is scalar and no data was given, so 'n_bins' is required"
    ))]
    MissingBinCount,

    /// The caller-supplied bin count disagrees with the data length.
    #[snafu(display("'n_bins' is {n_bins} but the input data has {rows} rows"))]
    BinCountMismatch {
        /// The `n_bins` argument.
        n_bins: usize,
        /// The input data row count.
        rows: usize,
    },

    /// A start vector does not match the data length.
    #[snafu(display(
        "Length of 'time_bin_start' ({start_len}) should match table length ({table_len})"
    ))]
    StartLengthMismatch {
        /// Length of the start vector.
        start_len: usize,
        /// Row count of the input data.
        table_len: usize,
    },

    /// An end vector does not match the start vector.
    #[snafu(display(
        "Length of 'time_bin_end' ({end_len}) should match the length of 'time_bin_start' ({start_len})"
    ))]
    EndLengthMismatch {
        /// Length of the end vector.
        end_len: usize,
        /// Length of the start vector.
        start_len: usize,
    },

    /// A size vector does not match the number of bins.
    #[snafu(display(
        "Length of 'time_bin_size' ({size_len}) should match the number of bins ({expected})"
    ))]
    SizeLengthMismatch {
        /// Length of the size vector.
        size_len: usize,
        /// The expected number of bins.
        expected: usize,
    },

    /// A `time_bin_size` column in the data is not a duration column.
    ///
    /// Bin sizes must be unit-bearing; a bare numeric column carries no
    /// unit and is rejected rather than guessed at.
    #[snafu(display("'time_bin_size' should be a duration column, got {datatype}"))]
    SizeNotDuration {
        /// The Arrow type of the rejected column.
        datatype: DataType,
    },

    /// A `time_bin_size` column contains a null.
    #[snafu(display("Null value at row {row} of column 'time_bin_size'"))]
    NullSizeValue {
        /// Zero-based row of the null.
        row: usize,
    },

    /// A requested column does not exist in the series.
    #[snafu(display("Column {column} not found"))]
    ColumnNotFound {
        /// The missing column name.
        column: String,
    },

    /// Converting an adopted `time_bin_start` column to instants failed.
    #[snafu(display("Cannot convert 'time_bin_start' column to times: {source}"))]
    StartColumn {
        /// The underlying conversion error.
        source: TimeColumnError,
    },

    /// Duration arithmetic overflowed while laying out bins.
    #[snafu(display("Duration arithmetic overflowed while laying out bins"))]
    DurationOverflow,

    /// Arrow rejected the materialized batch.
    #[snafu(display("Arrow error while materializing the binned table: {source}"))]
    Arrow {
        /// The underlying Arrow error.
        source: ArrowError,
    },
}
