//! Binned astronomical time series over Arrow record batches.
//!
//! This crate provides [`series::BinnedTimeSeries`], a table of measurements
//! where each row is associated with a time bin: a half-open interval
//! `[start, start + size)`. The bins may be contiguous or gapped, uniform or
//! of varying width, and are materialized as two canonical columns of the
//! underlying [`arrow::array::RecordBatch`]:
//!
//! - `time_bin_start`: `Timestamp(Microsecond, "UTC")`, at column position 0,
//!   marked with a lookup-index metadata flag.
//! - `time_bin_size`: `Duration(Microsecond)`, at column position 1.
//!
//! The interesting part is construction: callers can describe the bins in
//! several partial ways (one start plus a fixed width and a bin count,
//! explicit per-row starts plus a single closing end time, full start/end
//! vectors, columns already embedded in the input data, ...) and
//! [`series::BinnedTimeSeriesBuilder`] reconciles them into the canonical
//! column pair, or fails with a descriptive error before any column is
//! committed. Bin end and center times are derived views, recomputed on
//! every access from the two stored columns.
//!
//! The [`io`] module loads a binned series from a CSV or Parquet file by
//! mapping named file columns onto the builder's inputs.
#![deny(missing_docs)]
pub mod io;
pub mod series;
pub mod table;
pub mod time;
