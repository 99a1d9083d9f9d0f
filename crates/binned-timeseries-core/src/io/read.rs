//! Loading a binned series from CSV or Parquet files.
//!
//! The file is parsed with the matching Arrow reader, then caller-named
//! columns are consumed off the parsed table and converted into builder
//! inputs: the start column (mandatory) and exactly one of an end column or
//! a unit-bearing size column. Whatever remains becomes the measurement
//! data. All bin-boundary validation beyond column mapping lives in the
//! series builder.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use arrow::array::RecordBatch;
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use snafu::prelude::*;

use crate::io::error::{
    ArrowSnafu, ColumnNotFoundSnafu, EndOrSizeColumnSnafu, IoSnafu, MissingSizeUnitSnafu,
    ParquetSnafu, ReadError, SeriesSnafu, SizeOutOfRangeSnafu, TimeColumnSnafu,
    UnknownFormatSnafu, UnsupportedTimeScaleSnafu,
};
use crate::series::binned::BinnedTimeSeries;
use crate::table::columns;
use crate::time::format::{self, SizeUnit, TimeColumnError, TimeFormat, TimeScale};

/// Supported on-disk formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFormat {
    /// Delimiter-separated text, schema inferred from the data.
    Csv {
        /// Whether the first line is a header row.
        has_header: bool,
        /// The field delimiter byte.
        delimiter: u8,
    },
    /// Apache Parquet.
    Parquet,
}

impl FileFormat {
    /// Comma-separated CSV with a header row.
    pub fn csv() -> Self {
        FileFormat::Csv {
            has_header: true,
            delimiter: b',',
        }
    }
}

impl FromStr for FileFormat {
    type Err = ReadError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "csv" => Ok(FileFormat::csv()),
            "parquet" => Ok(FileFormat::Parquet),
            other => UnknownFormatSnafu { name: other }.fail(),
        }
    }
}

/// Column mapping and time encoding for [`read`].
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// File format to parse with.
    pub format: FileFormat,
    /// Name of the column holding bin start times.
    pub time_bin_start_column: String,
    /// Name of the column holding per-row bin end times, if any.
    pub time_bin_end_column: Option<String>,
    /// Name of the column holding numeric bin sizes, if any.
    pub time_bin_size_column: Option<String>,
    /// Unit of the size column; required with `time_bin_size_column`.
    pub time_bin_size_unit: Option<SizeUnit>,
    /// Encoding of the start/end column values.
    pub time_format: TimeFormat,
    /// Time scale of the start/end column values.
    pub time_scale: TimeScale,
}

impl ReadOptions {
    /// Options for `format` with the given start column, ISO time strings,
    /// UTC scale, and no end/size column yet.
    pub fn new(format: FileFormat, time_bin_start_column: impl Into<String>) -> Self {
        ReadOptions {
            format,
            time_bin_start_column: time_bin_start_column.into(),
            time_bin_end_column: None,
            time_bin_size_column: None,
            time_bin_size_unit: None,
            time_format: TimeFormat::Isot,
            time_scale: TimeScale::Utc,
        }
    }

    /// Name the column holding per-row bin end times.
    pub fn with_end_column(mut self, column: impl Into<String>) -> Self {
        self.time_bin_end_column = Some(column.into());
        self
    }

    /// Name the column holding numeric bin sizes, with its unit.
    pub fn with_size_column(mut self, column: impl Into<String>, unit: SizeUnit) -> Self {
        self.time_bin_size_column = Some(column.into());
        self.time_bin_size_unit = Some(unit);
        self
    }

    /// Declare the encoding of the time columns.
    pub fn with_time_format(mut self, time_format: TimeFormat) -> Self {
        self.time_format = time_format;
        self
    }

    /// Declare the time scale of the time columns.
    pub fn with_time_scale(mut self, time_scale: TimeScale) -> Self {
        self.time_scale = time_scale;
        self
    }
}

/// Read and parse a file into a [`BinnedTimeSeries`].
///
/// The file is parsed first; column mapping is then validated against the
/// parsed table:
///
/// - exactly one of `time_bin_end_column` / `time_bin_size_column` must be
///   set, and a size column requires `time_bin_size_unit`;
/// - the start column (and end column, if named) is converted via
///   `time_format` / `time_scale` and removed from the table;
/// - the size column is multiplied by its unit into durations and removed;
/// - the remaining columns become the series' measurement data.
pub fn read(path: impl AsRef<Path>, options: &ReadOptions) -> Result<BinnedTimeSeries, ReadError> {
    let path = path.as_ref();
    let table = read_table(path, &options.format)?;
    debug!(
        "read {} rows x {} columns from {}",
        table.num_rows(),
        table.num_columns(),
        path.display()
    );

    ensure!(
        options.time_bin_end_column.is_some() != options.time_bin_size_column.is_some(),
        EndOrSizeColumnSnafu
    );
    ensure!(
        options.time_scale == TimeScale::Utc,
        UnsupportedTimeScaleSnafu {
            scale: options.time_scale,
        }
    );

    let (table, starts) =
        consume_time_column(table, &options.time_bin_start_column, options.time_format)?;
    let mut builder = BinnedTimeSeries::builder().time_bin_start(starts);

    let table = match (&options.time_bin_end_column, &options.time_bin_size_column) {
        (Some(end_column), None) => {
            let (rest, ends) = consume_time_column(table, end_column, options.time_format)?;
            builder = builder.time_bin_end(ends);
            rest
        }
        (None, Some(size_column)) => {
            let unit = options.time_bin_size_unit.context(MissingSizeUnitSnafu)?;
            let (rest, sizes) = consume_size_column(table, size_column, unit)?;
            builder = builder.time_bin_size(sizes);
            rest
        }
        // Guarded above; kept for exhaustiveness.
        _ => return EndOrSizeColumnSnafu.fail(),
    };

    let n_bins = table.num_rows();
    builder.data(table).n_bins(n_bins).build().context(SeriesSnafu)
}

/// Parse the whole file into a single batch.
fn read_table(path: &Path, format: &FileFormat) -> Result<RecordBatch, ReadError> {
    match format {
        FileFormat::Csv {
            has_header,
            delimiter,
        } => {
            let mut file = File::open(path).context(IoSnafu { path })?;
            let csv_format = Format::default()
                .with_header(*has_header)
                .with_delimiter(*delimiter);
            let (schema, _) = csv_format
                .infer_schema(&mut file, None)
                .context(ArrowSnafu)?;
            file.rewind().context(IoSnafu { path })?;

            let schema = Arc::new(schema);
            let reader = ReaderBuilder::new(schema.clone())
                .with_format(csv_format)
                .build(file)
                .context(ArrowSnafu)?;
            let batches: Vec<RecordBatch> =
                reader.collect::<Result<_, _>>().context(ArrowSnafu)?;
            concat_batches(&schema, &batches).context(ArrowSnafu)
        }
        FileFormat::Parquet => {
            let file = File::open(path).context(IoSnafu { path })?;
            let builder = ParquetRecordBatchReaderBuilder::try_new(file).context(ParquetSnafu)?;
            let schema = builder.schema().clone();
            let reader = builder.build().context(ParquetSnafu)?;
            let batches: Vec<RecordBatch> =
                reader.collect::<Result<_, _>>().context(ArrowSnafu)?;
            concat_batches(&schema, &batches).context(ArrowSnafu)
        }
    }
}

/// Consume a named time column off the table.
fn consume_time_column(
    table: RecordBatch,
    column: &str,
    time_format: TimeFormat,
) -> Result<(RecordBatch, Vec<DateTime<Utc>>), ReadError> {
    let taken = columns::take_column(&table, column)
        .context(ArrowSnafu)?
        .context(ColumnNotFoundSnafu { column })?;
    let times =
        format::column_to_times(column, &taken.values, time_format).context(TimeColumnSnafu)?;
    Ok((taken.rest, times))
}

/// Consume a named numeric size column off the table, applying its unit.
fn consume_size_column(
    table: RecordBatch,
    column: &str,
    unit: SizeUnit,
) -> Result<(RecordBatch, Vec<Duration>), ReadError> {
    let taken = columns::take_column(&table, column)
        .context(ArrowSnafu)?
        .context(ColumnNotFoundSnafu { column })?;
    let raw = format::numeric_column_values(column, &taken.values).map_err(|err| match err {
        TimeColumnError::NullValue { row, .. } => ReadError::NullSizeValue {
            column: column.to_string(),
            row,
        },
        TimeColumnError::UnsupportedArrowType { datatype, .. } => ReadError::NonNumericSizeColumn {
            column: column.to_string(),
            datatype,
        },
        other => ReadError::TimeColumn { source: other },
    })?;
    let sizes = raw
        .iter()
        .enumerate()
        .map(|(row, value)| {
            unit.duration_from(*value).context(SizeOutOfRangeSnafu {
                column,
                row,
                value: *value,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((taken.rest, sizes))
}
