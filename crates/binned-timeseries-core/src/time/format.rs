//! Conversion of raw table columns into UTC instants and durations.
//!
//! File data arrives as Arrow arrays of strings, numbers, or native
//! timestamps; this module converts them into `DateTime<Utc>` vectors
//! according to a declared [`TimeFormat`]. Native timestamp columns of any
//! unit are accepted regardless of the declared format (they already carry
//! their own encoding). Internally everything is normalized to microseconds
//! since the Unix epoch, with checked arithmetic; values that cannot be
//! represented report as errors rather than wrapping.
//!
//! [`SizeUnit`] is the unit descriptor a caller attaches to a bare numeric
//! bin-size column to make it a duration.

use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
    TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray,
};
use arrow::datatypes::{DataType, TimeUnit as ArrowTimeUnit};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use snafu::prelude::*;

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_SECOND_F: f64 = 1_000_000.0;
const MICROS_PER_DAY_F: f64 = 86_400.0 * MICROS_PER_SECOND_F;

/// Modified Julian Date of the Unix epoch (1970-01-01T00:00:00 UTC).
const MJD_UNIX_EPOCH: f64 = 40587.0;

/// How raw column values encode instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// ISO-8601 strings with a `T` separator, e.g. `2016-03-22T12:30:31`
    /// or `2016-03-22T12:30:31.000Z`. Values without an explicit offset
    /// are taken as UTC.
    Isot,
    /// Numeric seconds since the Unix epoch.
    UnixSeconds,
    /// Numeric Modified Julian Date.
    Mjd,
}

/// The time scale raw values are expressed in.
///
/// Only [`TimeScale::Utc`] is supported for loading; scale conversion is a
/// collaborator concern this crate does not reimplement. The other variants
/// exist so callers can state what their data is in and get a clear error
/// instead of silently mislabeled instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeScale {
    /// Coordinated Universal Time.
    Utc,
    /// International Atomic Time.
    Tai,
    /// Terrestrial Time.
    Tt,
}

/// Unit attached to a bare numeric bin-size column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    /// Microseconds.
    Microseconds,
    /// Milliseconds.
    Milliseconds,
    /// Seconds.
    Seconds,
    /// Minutes.
    Minutes,
    /// Hours.
    Hours,
    /// Days (86400 seconds).
    Days,
}

impl SizeUnit {
    fn micros_per_unit(self) -> f64 {
        match self {
            SizeUnit::Microseconds => 1.0,
            SizeUnit::Milliseconds => 1_000.0,
            SizeUnit::Seconds => MICROS_PER_SECOND_F,
            SizeUnit::Minutes => 60.0 * MICROS_PER_SECOND_F,
            SizeUnit::Hours => 3_600.0 * MICROS_PER_SECOND_F,
            SizeUnit::Days => MICROS_PER_DAY_F,
        }
    }

    /// Interpret `value` in this unit as a duration.
    ///
    /// Returns `None` for non-finite values or values whose microsecond
    /// count does not fit in `i64`.
    pub fn duration_from(self, value: f64) -> Option<Duration> {
        let micros = value * self.micros_per_unit();
        if !micros.is_finite() {
            return None;
        }
        let rounded = micros.round();
        if rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
            return None;
        }
        Some(Duration::microseconds(rounded as i64))
    }
}

/// Errors raised when converting a raw column into instants.
#[derive(Debug, Snafu, Clone, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum TimeColumnError {
    /// The column's Arrow type cannot encode instants in the declared format.
    #[snafu(display("Unsupported arrow type for time column {column}: {datatype}"))]
    UnsupportedArrowType {
        /// Name of the offending column.
        column: String,
        /// The Arrow data type that was found.
        datatype: DataType,
    },

    /// A value could not be parsed in the declared format.
    #[snafu(display("Cannot parse {value:?} in column {column} as {format:?}"))]
    Unparseable {
        /// Name of the offending column.
        column: String,
        /// The raw value that failed to parse.
        value: String,
        /// The format the value was expected to be in.
        format: TimeFormat,
    },

    /// The column contains a null where an instant is required.
    #[snafu(display("Null value at row {row} of time column {column}"))]
    NullValue {
        /// Name of the offending column.
        column: String,
        /// Zero-based row of the null.
        row: usize,
    },

    /// The value is outside the representable microsecond timestamp range.
    #[snafu(display("Value {value} in column {column} is outside the supported time range"))]
    OutOfRange {
        /// Name of the offending column.
        column: String,
        /// The raw value, rendered for the message.
        value: String,
    },
}

fn micros_to_datetime(column: &str, micros: i64) -> Result<DateTime<Utc>, TimeColumnError> {
    DateTime::from_timestamp_micros(micros).context(OutOfRangeSnafu {
        column,
        value: micros.to_string(),
    })
}

fn float_to_micros(column: &str, micros: f64) -> Result<i64, TimeColumnError> {
    let rounded = micros.round();
    ensure!(
        micros.is_finite() && rounded >= i64::MIN as f64 && rounded <= i64::MAX as f64,
        OutOfRangeSnafu {
            column,
            value: micros.to_string(),
        }
    );
    Ok(rounded as i64)
}

fn parse_isot(column: &str, value: &str) -> Result<DateTime<Utc>, TimeColumnError> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Ok(with_offset.with_timezone(&Utc));
    }
    // Astronomical ISO strings commonly omit the offset; take them as UTC.
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .ok()
        .context(UnparseableSnafu {
            column,
            value,
            format: TimeFormat::Isot,
        })
}

/// Extract a numeric column as `f64` values, rejecting nulls.
pub(crate) fn numeric_column_values(
    column: &str,
    values: &ArrayRef,
) -> Result<Vec<f64>, TimeColumnError> {
    macro_rules! collect_numeric {
        ($array_ty:ty) => {{
            let arr = values
                .as_any()
                .downcast_ref::<$array_ty>()
                .expect("data type and array type are paired");
            (0..arr.len())
                .map(|row| {
                    ensure!(!arr.is_null(row), NullValueSnafu { column, row });
                    Ok(arr.value(row) as f64)
                })
                .collect()
        }};
    }

    match values.data_type() {
        DataType::Int32 => collect_numeric!(Int32Array),
        DataType::Int64 => collect_numeric!(Int64Array),
        DataType::Float32 => collect_numeric!(Float32Array),
        DataType::Float64 => collect_numeric!(Float64Array),
        other => UnsupportedArrowTypeSnafu {
            column,
            datatype: other.clone(),
        }
        .fail(),
    }
}

/// Convert a native Arrow timestamp column (any unit) into UTC instants.
///
/// Arrow timestamps are epoch-relative regardless of their timezone
/// annotation, so the annotation is ignored here. Nanosecond values are
/// truncated to microsecond precision.
pub fn timestamp_column_to_times(
    column: &str,
    values: &ArrayRef,
) -> Result<Vec<DateTime<Utc>>, TimeColumnError> {
    macro_rules! collect_timestamps {
        ($array_ty:ty, $to_micros:expr) => {{
            let arr = values
                .as_any()
                .downcast_ref::<$array_ty>()
                .expect("timestamp unit and array type are paired");
            let to_micros = $to_micros;
            (0..arr.len())
                .map(|row| {
                    ensure!(!arr.is_null(row), NullValueSnafu { column, row });
                    let micros = to_micros(arr.value(row))?;
                    micros_to_datetime(column, micros)
                })
                .collect()
        }};
    }

    match values.data_type() {
        DataType::Timestamp(ArrowTimeUnit::Second, _) => {
            collect_timestamps!(TimestampSecondArray, |v: i64| {
                v.checked_mul(MICROS_PER_SECOND).context(OutOfRangeSnafu {
                    column,
                    value: v.to_string(),
                })
            })
        }
        DataType::Timestamp(ArrowTimeUnit::Millisecond, _) => {
            collect_timestamps!(TimestampMillisecondArray, |v: i64| {
                v.checked_mul(1_000).context(OutOfRangeSnafu {
                    column,
                    value: v.to_string(),
                })
            })
        }
        DataType::Timestamp(ArrowTimeUnit::Microsecond, _) => {
            collect_timestamps!(TimestampMicrosecondArray, |v: i64| Ok(v))
        }
        DataType::Timestamp(ArrowTimeUnit::Nanosecond, _) => {
            collect_timestamps!(TimestampNanosecondArray, |v: i64| Ok(v.div_euclid(1_000)))
        }
        other => UnsupportedArrowTypeSnafu {
            column,
            datatype: other.clone(),
        }
        .fail(),
    }
}

/// Convert a raw column into UTC instants according to `format`.
///
/// Native timestamp columns are accepted for every format; otherwise the
/// accepted Arrow types depend on the format (Utf8 for [`TimeFormat::Isot`],
/// numeric types for [`TimeFormat::UnixSeconds`] and [`TimeFormat::Mjd`]).
pub fn column_to_times(
    column: &str,
    values: &ArrayRef,
    format: TimeFormat,
) -> Result<Vec<DateTime<Utc>>, TimeColumnError> {
    match (format, values.data_type()) {
        (_, DataType::Timestamp(_, _)) => timestamp_column_to_times(column, values),
        (TimeFormat::Isot, DataType::Utf8) => {
            let arr = values
                .as_any()
                .downcast_ref::<StringArray>()
                .expect("Utf8 columns downcast to StringArray");
            (0..arr.len())
                .map(|row| {
                    ensure!(!arr.is_null(row), NullValueSnafu { column, row });
                    parse_isot(column, arr.value(row))
                })
                .collect()
        }
        (TimeFormat::UnixSeconds, _) => numeric_column_values(column, values)?
            .into_iter()
            .map(|secs| {
                let micros = float_to_micros(column, secs * MICROS_PER_SECOND_F)?;
                micros_to_datetime(column, micros)
            })
            .collect(),
        (TimeFormat::Mjd, _) => numeric_column_values(column, values)?
            .into_iter()
            .map(|mjd| {
                let micros = float_to_micros(column, (mjd - MJD_UNIX_EPOCH) * MICROS_PER_DAY_F)?;
                micros_to_datetime(column, micros)
            })
            .collect(),
        (_, other) => UnsupportedArrowTypeSnafu {
            column,
            datatype: other.clone(),
        }
        .fail(),
    }
}
