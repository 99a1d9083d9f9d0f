//! Bin-boundary normalization: the series builder.
//!
//! Callers describe bins in whichever partial form they have -- one origin
//! plus a fixed width and count, explicit per-row starts plus a closing end
//! time, full start/end vectors, or columns already embedded in the data --
//! and `build` reconciles them into the canonical `(start, size)` column
//! pair. Validation order matters and is fixed:
//!
//! 1. Adopt `time_bin_start` / `time_bin_size` columns found in the data
//!    (each is an error if also given as an argument).
//! 2. A start must be resolvable; so must at least one of end/size.
//! 3. Branch on scalar vs. vector start and derive per-bin widths.
//! 4. Materialize one new batch with the canonical columns at positions
//!    0 and 1. Nothing partial is ever observable: the builder owns its
//!    inputs and either returns a complete series or an error.
//!
//! Negative or overlapping bins are accepted silently; only length
//! consistency is enforced.

use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, DurationMicrosecondArray, DurationMillisecondArray, DurationNanosecondArray,
    DurationSecondArray, RecordBatch, TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, FieldRef, TimeUnit};
use chrono::{DateTime, Duration, Utc};
use log::debug;
use snafu::prelude::*;

use crate::series::binned::{BinnedTimeSeries, LOOKUP_INDEX_KEY, TIME_BIN_SIZE, TIME_BIN_START};
use crate::series::error::{
    AmbiguousColumnSnafu, ArrowSnafu, BinCountMismatchSnafu, BinnedSeriesError,
    DurationOverflowSnafu, EndLengthMismatchSnafu, MissingBinCountSnafu, MissingEndOrSizeSnafu,
    MissingStartSnafu, NullSizeValueSnafu, ScalarStartNeedsSizeSnafu, SizeLengthMismatchSnafu,
    SizeNotDurationSnafu, StartColumnSnafu, StartLengthMismatchSnafu,
};
use crate::table::columns;
use crate::table::groups::TableGroups;
use crate::time::format::{self, TimeFormat};
use crate::time::input::{cumulative_sum, shift_right_with_zero, DurationInput, TimeInput};

/// Builder reconciling partial bin specifications into a [`BinnedTimeSeries`].
///
/// All inputs are optional; [`build`](Self::build) validates the combination.
/// See the module docs for the accepted shapes.
#[derive(Debug, Default, Clone)]
pub struct BinnedTimeSeriesBuilder {
    data: Option<RecordBatch>,
    time_bin_start: Option<TimeInput>,
    time_bin_end: Option<TimeInput>,
    time_bin_size: Option<DurationInput>,
    n_bins: Option<usize>,
}

impl BinnedTimeSeriesBuilder {
    /// New builder with no inputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the measurement data. May already contain `time_bin_start`
    /// and/or `time_bin_size` columns, which are adopted as inputs.
    pub fn data(mut self, data: RecordBatch) -> Self {
        self.data = Some(data);
        self
    }

    /// Bin start: a single origin (uniform-origin mode) or one start per
    /// row (explicit-start mode).
    pub fn time_bin_start(mut self, start: impl Into<TimeInput>) -> Self {
        self.time_bin_start = Some(start.into());
        self
    }

    /// Bin end: a single closing instant for the last bin, or one end per
    /// row.
    pub fn time_bin_end(mut self, end: impl Into<TimeInput>) -> Self {
        self.time_bin_end = Some(end.into());
        self
    }

    /// Bin width: a single width broadcast over all bins, or one per bin.
    pub fn time_bin_size(mut self, size: impl Into<DurationInput>) -> Self {
        self.time_bin_size = Some(size.into());
        self
    }

    /// Number of bins, for uniform-origin construction without data.
    pub fn n_bins(mut self, n_bins: usize) -> Self {
        self.n_bins = Some(n_bins);
        self
    }

    /// Normalize the inputs and materialize the series.
    pub fn build(self) -> Result<BinnedTimeSeries, BinnedSeriesError> {
        let BinnedTimeSeriesBuilder {
            mut data,
            mut time_bin_start,
            time_bin_end,
            mut time_bin_size,
            n_bins,
        } = self;

        // Adopt bin columns embedded in the data, rejecting double
        // specification.
        if let Some(batch) = data.take() {
            let (rest, adopted_start) = adopt_start_column(batch, time_bin_start.is_some())?;
            if adopted_start.is_some() {
                time_bin_start = adopted_start;
            }
            let (rest, adopted_size) = adopt_size_column(rest, time_bin_size.is_some())?;
            if adopted_size.is_some() {
                time_bin_size = adopted_size;
            }
            data = Some(rest);
        }

        let start = time_bin_start.context(MissingStartSnafu)?;
        ensure!(
            time_bin_end.is_some() || time_bin_size.is_some(),
            MissingEndOrSizeSnafu
        );

        let (starts, sizes) = match start {
            TimeInput::Scalar(origin) => {
                contiguous_from_origin(origin, time_bin_size, data.as_ref(), n_bins)?
            }
            TimeInput::Vector(starts) => {
                explicit_starts(starts, time_bin_end, time_bin_size, data.as_ref())?
            }
        };

        materialize(data, starts, sizes)
    }
}

/// Lay out contiguous bins forward from a single origin.
fn contiguous_from_origin(
    origin: DateTime<Utc>,
    size: Option<DurationInput>,
    data: Option<&RecordBatch>,
    n_bins: Option<usize>,
) -> Result<(Vec<DateTime<Utc>>, Vec<Duration>), BinnedSeriesError> {
    let size = size.context(ScalarStartNeedsSizeSnafu)?;

    let rows = data.map(|b| b.num_rows());
    if let (Some(rows), Some(n_bins)) = (rows, n_bins) {
        ensure!(n_bins == rows, BinCountMismatchSnafu { n_bins, rows });
    }

    let sizes = match size {
        DurationInput::Scalar(width) => {
            let n = rows.or(n_bins).context(MissingBinCountSnafu)?;
            vec![width; n]
        }
        DurationInput::Vector(widths) => {
            if let Some(rows) = rows {
                ensure!(
                    widths.len() == rows,
                    SizeLengthMismatchSnafu {
                        size_len: widths.len(),
                        expected: rows,
                    }
                );
            }
            widths
        }
    };

    debug!(
        "laying out {} contiguous bins from origin {origin}",
        sizes.len()
    );

    // Cumulative widths give each bin's end offset; shifting right one slot
    // with a zero first entry gives the start offsets.
    let end_offsets = cumulative_sum(&sizes).context(DurationOverflowSnafu)?;
    let start_offsets = shift_right_with_zero(&end_offsets);
    let starts = start_offsets
        .iter()
        .map(|offset| {
            origin
                .checked_add_signed(*offset)
                .context(DurationOverflowSnafu)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((starts, sizes))
}

/// Derive per-bin widths for caller-supplied per-row starts.
fn explicit_starts(
    starts: Vec<DateTime<Utc>>,
    end: Option<TimeInput>,
    size: Option<DurationInput>,
    data: Option<&RecordBatch>,
) -> Result<(Vec<DateTime<Utc>>, Vec<Duration>), BinnedSeriesError> {
    if let Some(batch) = data {
        if batch.num_columns() > 0 {
            ensure!(
                starts.len() == batch.num_rows(),
                StartLengthMismatchSnafu {
                    start_len: starts.len(),
                    table_len: batch.num_rows(),
                }
            );
        }
    }

    debug!("using {} explicit bin starts", starts.len());

    // An end takes precedence over a supplied size, matching the reference
    // behavior.
    let sizes = match (end, size) {
        (Some(TimeInput::Scalar(closing)), _) => {
            // Each bin runs to the next bin's start; the scalar end closes
            // out the last bin.
            let mut sizes = Vec::with_capacity(starts.len());
            for pair in starts.windows(2) {
                sizes.push(pair[1].signed_duration_since(pair[0]));
            }
            if let Some(last) = starts.last() {
                sizes.push(closing.signed_duration_since(*last));
            }
            sizes
        }
        (Some(TimeInput::Vector(ends)), _) => {
            ensure!(
                ends.len() == starts.len(),
                EndLengthMismatchSnafu {
                    end_len: ends.len(),
                    start_len: starts.len(),
                }
            );
            starts
                .iter()
                .zip(&ends)
                .map(|(start, end)| end.signed_duration_since(*start))
                .collect()
        }
        (None, Some(DurationInput::Scalar(width))) => vec![width; starts.len()],
        (None, Some(DurationInput::Vector(widths))) => {
            ensure!(
                widths.len() == starts.len(),
                SizeLengthMismatchSnafu {
                    size_len: widths.len(),
                    expected: starts.len(),
                }
            );
            widths
        }
        // Guarded before branching; kept for exhaustiveness.
        (None, None) => return MissingEndOrSizeSnafu.fail(),
    };

    Ok((starts, sizes))
}

/// Build the final batch with the canonical columns at positions 0 and 1.
fn materialize(
    data: Option<RecordBatch>,
    starts: Vec<DateTime<Utc>>,
    sizes: Vec<Duration>,
) -> Result<BinnedTimeSeries, BinnedSeriesError> {
    let n = starts.len();

    let start_micros: Vec<i64> = starts.iter().map(DateTime::timestamp_micros).collect();
    let size_micros: Vec<i64> = sizes
        .iter()
        .map(|size| size.num_microseconds().context(DurationOverflowSnafu))
        .collect::<Result<_, _>>()?;

    // The views recompute `start + size` on every access and rely on every
    // bin end being a representable instant; enforce that here so the
    // accessors stay infallible.
    for (start, size) in start_micros.iter().zip(&size_micros) {
        let end = start.checked_add(*size).context(DurationOverflowSnafu)?;
        DateTime::from_timestamp_micros(end).context(DurationOverflowSnafu)?;
    }

    let start_field: FieldRef = Arc::new(
        Field::new(
            TIME_BIN_START,
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        )
        .with_metadata(HashMap::from([(
            LOOKUP_INDEX_KEY.to_string(),
            "true".to_string(),
        )])),
    );
    let size_field: FieldRef = Arc::new(Field::new(
        TIME_BIN_SIZE,
        DataType::Duration(TimeUnit::Microsecond),
        false,
    ));

    let start_values: ArrayRef =
        Arc::new(TimestampMicrosecondArray::from(start_micros).with_timezone("UTC"));
    let size_values: ArrayRef = Arc::new(DurationMicrosecondArray::from(size_micros));

    let batch = columns::with_leading_columns(
        data.as_ref(),
        vec![(start_field, start_values), (size_field, size_values)],
        n,
    )
    .context(ArrowSnafu)?;

    Ok(BinnedTimeSeries::from_parts(batch, TableGroups::trivial(n)))
}

/// Pull a `time_bin_start` column out of the data, if present.
fn adopt_start_column(
    batch: RecordBatch,
    given_as_argument: bool,
) -> Result<(RecordBatch, Option<TimeInput>), BinnedSeriesError> {
    let Some(taken) = columns::take_column(&batch, TIME_BIN_START).context(ArrowSnafu)? else {
        return Ok((batch, None));
    };
    ensure!(
        !given_as_argument,
        AmbiguousColumnSnafu {
            column: TIME_BIN_START,
        }
    );
    // Accepts native timestamp columns of any unit and ISO strings; this is
    // the coercion-to-Time step.
    let times = format::column_to_times(TIME_BIN_START, &taken.values, TimeFormat::Isot)
        .context(StartColumnSnafu)?;
    Ok((taken.rest, Some(TimeInput::Vector(times))))
}

/// Pull a `time_bin_size` column out of the data, if present.
fn adopt_size_column(
    batch: RecordBatch,
    given_as_argument: bool,
) -> Result<(RecordBatch, Option<DurationInput>), BinnedSeriesError> {
    let Some(taken) = columns::take_column(&batch, TIME_BIN_SIZE).context(ArrowSnafu)? else {
        return Ok((batch, None));
    };
    ensure!(
        !given_as_argument,
        AmbiguousColumnSnafu {
            column: TIME_BIN_SIZE,
        }
    );
    let sizes = duration_column_to_sizes(&taken.values)?;
    Ok((taken.rest, Some(DurationInput::Vector(sizes))))
}

/// Convert a unit-bearing duration column into widths.
///
/// Only Arrow `Duration` columns qualify; a bare numeric column has no unit
/// and is rejected. Nanosecond values are truncated to microseconds.
fn duration_column_to_sizes(values: &ArrayRef) -> Result<Vec<Duration>, BinnedSeriesError> {
    macro_rules! collect_durations {
        ($array_ty:ty, $to_micros:expr) => {{
            let arr = values
                .as_any()
                .downcast_ref::<$array_ty>()
                .expect("duration unit and array type are paired");
            let to_micros = $to_micros;
            (0..arr.len())
                .map(|row| {
                    ensure!(!arr.is_null(row), NullSizeValueSnafu { row });
                    let micros: i64 = to_micros(arr.value(row))?;
                    Ok(Duration::microseconds(micros))
                })
                .collect()
        }};
    }

    match values.data_type() {
        DataType::Duration(TimeUnit::Second) => {
            collect_durations!(DurationSecondArray, |v: i64| {
                v.checked_mul(1_000_000).context(DurationOverflowSnafu)
            })
        }
        DataType::Duration(TimeUnit::Millisecond) => {
            collect_durations!(DurationMillisecondArray, |v: i64| {
                v.checked_mul(1_000).context(DurationOverflowSnafu)
            })
        }
        DataType::Duration(TimeUnit::Microsecond) => {
            collect_durations!(DurationMicrosecondArray, |v: i64| Ok(v))
        }
        DataType::Duration(TimeUnit::Nanosecond) => {
            collect_durations!(DurationNanosecondArray, |v: i64| Ok(v.div_euclid(1_000)))
        }
        other => SizeNotDurationSnafu {
            datatype: other.clone(),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::Schema;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn flux_batch(values: Vec<f64>) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "flux",
            DataType::Float64,
            false,
        )]));
        RecordBatch::try_new(schema, vec![Arc::new(Float64Array::from(values))]).unwrap()
    }

    #[test]
    fn scalar_origin_with_fixed_width() {
        let t0 = utc(2016, 3, 22, 12, 30, 31);
        let series = BinnedTimeSeriesBuilder::new()
            .data(flux_batch(vec![1.0, 4.0, 3.0]))
            .time_bin_start(t0)
            .time_bin_size(Duration::seconds(3))
            .build()
            .unwrap();

        assert_eq!(
            series.time_bin_start(),
            vec![t0, t0 + Duration::seconds(3), t0 + Duration::seconds(6)]
        );
        assert_eq!(
            series.time_bin_end(),
            vec![
                t0 + Duration::seconds(3),
                t0 + Duration::seconds(6),
                t0 + Duration::seconds(9),
            ]
        );
        assert!(series
            .time_bin_size()
            .iter()
            .all(|size| *size == Duration::seconds(3)));
    }

    #[test]
    fn scalar_origin_with_varying_widths_infers_count() {
        let t0 = utc(2016, 3, 22, 12, 0, 0);
        let series = BinnedTimeSeriesBuilder::new()
            .time_bin_start(t0)
            .time_bin_size(vec![
                Duration::seconds(10),
                Duration::seconds(20),
                Duration::seconds(30),
            ])
            .build()
            .unwrap();

        assert_eq!(
            series.time_bin_start(),
            vec![t0, t0 + Duration::seconds(10), t0 + Duration::seconds(30)]
        );
        assert_eq!(
            series.time_bin_end(),
            vec![
                t0 + Duration::seconds(10),
                t0 + Duration::seconds(30),
                t0 + Duration::seconds(60),
            ]
        );
    }

    #[test]
    fn scalar_origin_without_size_is_an_error() {
        let err = BinnedTimeSeriesBuilder::new()
            .time_bin_start(utc(2016, 1, 1, 0, 0, 0))
            .time_bin_end(utc(2016, 1, 2, 0, 0, 0))
            .build()
            .unwrap_err();
        assert!(matches!(err, BinnedSeriesError::ScalarStartNeedsSize));
    }

    #[test]
    fn scalar_size_without_count_source_is_an_error() {
        let err = BinnedTimeSeriesBuilder::new()
            .time_bin_start(utc(2016, 1, 1, 0, 0, 0))
            .time_bin_size(Duration::seconds(60))
            .build()
            .unwrap_err();
        assert!(matches!(err, BinnedSeriesError::MissingBinCount));
    }

    #[test]
    fn n_bins_must_agree_with_data_length() {
        let err = BinnedTimeSeriesBuilder::new()
            .data(flux_batch(vec![1.0, 2.0]))
            .time_bin_start(utc(2016, 1, 1, 0, 0, 0))
            .time_bin_size(Duration::seconds(60))
            .n_bins(5)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            BinnedSeriesError::BinCountMismatch { n_bins: 5, rows: 2 }
        ));
    }

    #[test]
    fn missing_start_is_an_error() {
        let err = BinnedTimeSeriesBuilder::new()
            .time_bin_size(Duration::seconds(60))
            .build()
            .unwrap_err();
        assert!(matches!(err, BinnedSeriesError::MissingStart));
    }

    #[test]
    fn missing_both_end_and_size_is_an_error() {
        let err = BinnedTimeSeriesBuilder::new()
            .time_bin_start(utc(2016, 1, 1, 0, 0, 0))
            .build()
            .unwrap_err();
        assert!(matches!(err, BinnedSeriesError::MissingEndOrSize));
    }

    #[test]
    fn explicit_starts_with_scalar_end() {
        let t0 = utc(2016, 3, 22, 12, 30, 31);
        let t1 = utc(2016, 3, 22, 12, 30, 32);
        let t2 = utc(2016, 3, 22, 12, 30, 40);
        let closing = utc(2016, 3, 22, 12, 30, 55);

        let series = BinnedTimeSeriesBuilder::new()
            .time_bin_start(vec![t0, t1, t2])
            .time_bin_end(closing)
            .build()
            .unwrap();

        assert_eq!(
            series.time_bin_size(),
            vec![t1 - t0, t2 - t1, closing - t2]
        );
        assert_eq!(series.time_bin_end(), vec![t1, t2, closing]);
    }

    #[test]
    fn explicit_starts_with_end_vector() {
        let t0 = utc(2016, 3, 22, 12, 30, 31);
        let t1 = utc(2016, 3, 22, 12, 30, 33);
        let series = BinnedTimeSeriesBuilder::new()
            .time_bin_start(vec![t0, t1])
            .time_bin_end(vec![t0 + Duration::seconds(5), t1 + Duration::seconds(7)])
            .build()
            .unwrap();
        assert_eq!(
            series.time_bin_size(),
            vec![Duration::seconds(5), Duration::seconds(7)]
        );
    }

    #[test]
    fn end_vector_of_wrong_length_is_an_error() {
        let t0 = utc(2016, 3, 22, 12, 30, 31);
        let err = BinnedTimeSeriesBuilder::new()
            .time_bin_start(vec![t0, t0 + Duration::seconds(1)])
            .time_bin_end(vec![t0 + Duration::seconds(5)])
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            BinnedSeriesError::EndLengthMismatch {
                end_len: 1,
                start_len: 2,
            }
        ));
    }

    #[test]
    fn start_vector_must_match_table_length() {
        let t0 = utc(2016, 1, 1, 0, 0, 0);
        let starts: Vec<_> = (0..3).map(|i| t0 + Duration::seconds(i)).collect();
        let err = BinnedTimeSeriesBuilder::new()
            .data(flux_batch(vec![1.0; 5]))
            .time_bin_start(starts)
            .time_bin_size(Duration::seconds(1))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            BinnedSeriesError::StartLengthMismatch {
                start_len: 3,
                table_len: 5,
            }
        ));
    }

    #[test]
    fn end_takes_precedence_over_size_for_explicit_starts() {
        let t0 = utc(2016, 1, 1, 0, 0, 0);
        let t1 = t0 + Duration::seconds(10);
        let series = BinnedTimeSeriesBuilder::new()
            .time_bin_start(vec![t0, t1])
            .time_bin_end(vec![t0 + Duration::seconds(2), t1 + Duration::seconds(4)])
            .time_bin_size(Duration::seconds(999))
            .build()
            .unwrap();
        assert_eq!(
            series.time_bin_size(),
            vec![Duration::seconds(2), Duration::seconds(4)]
        );
    }

    #[test]
    fn negative_bin_sizes_are_accepted_silently() {
        let t0 = utc(2016, 1, 1, 0, 0, 0);
        let series = BinnedTimeSeriesBuilder::new()
            .time_bin_start(vec![t0, t0 + Duration::seconds(10)])
            .time_bin_end(vec![t0 - Duration::seconds(5), t0])
            .build()
            .unwrap();
        assert_eq!(
            series.time_bin_size(),
            vec![Duration::seconds(-5), Duration::seconds(-10)]
        );
    }

    #[test]
    fn start_column_in_data_is_adopted() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(TIME_BIN_START, DataType::Utf8, false),
            Field::new("flux", DataType::Float64, false),
        ]));
        let data = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![
                    "2016-03-22T12:30:31",
                    "2016-03-22T12:30:32",
                ])),
                Arc::new(Float64Array::from(vec![1.0, 2.0])),
            ],
        )
        .unwrap();

        let series = BinnedTimeSeriesBuilder::new()
            .data(data)
            .time_bin_size(Duration::seconds(1))
            .build()
            .unwrap();

        assert_eq!(
            series.time_bin_start(),
            vec![
                utc(2016, 3, 22, 12, 30, 31),
                utc(2016, 3, 22, 12, 30, 32),
            ]
        );
        // The adopted column is consumed; only the canonical pair and the
        // data column remain.
        assert_eq!(
            series.column_names(),
            vec![TIME_BIN_START, TIME_BIN_SIZE, "flux"]
        );
    }

    #[test]
    fn start_column_given_twice_is_ambiguous() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            TIME_BIN_START,
            DataType::Utf8,
            false,
        )]));
        let data = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(vec!["2016-03-22T12:30:31"]))],
        )
        .unwrap();

        let err = BinnedTimeSeriesBuilder::new()
            .data(data)
            .time_bin_start(utc(2016, 3, 22, 12, 30, 31))
            .time_bin_size(Duration::seconds(1))
            .build()
            .unwrap_err();
        assert!(
            matches!(err, BinnedSeriesError::AmbiguousColumn { ref column } if column == TIME_BIN_START)
        );
    }

    #[test]
    fn size_column_in_data_is_adopted_as_durations() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            TIME_BIN_SIZE,
            DataType::Duration(TimeUnit::Second),
            false,
        )]));
        let data = RecordBatch::try_new(
            schema,
            vec![Arc::new(DurationSecondArray::from(vec![5_i64, 7]))],
        )
        .unwrap();

        let t0 = utc(2016, 1, 1, 0, 0, 0);
        let series = BinnedTimeSeriesBuilder::new()
            .data(data)
            .time_bin_start(vec![t0, t0 + Duration::seconds(5)])
            .build()
            .unwrap();
        assert_eq!(
            series.time_bin_size(),
            vec![Duration::seconds(5), Duration::seconds(7)]
        );
    }

    #[test]
    fn numeric_size_column_is_rejected_as_unitless() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            TIME_BIN_SIZE,
            DataType::Float64,
            false,
        )]));
        let data = RecordBatch::try_new(
            schema,
            vec![Arc::new(Float64Array::from(vec![5.0, 7.0]))],
        )
        .unwrap();

        let err = BinnedTimeSeriesBuilder::new()
            .data(data)
            .time_bin_start(vec![
                utc(2016, 1, 1, 0, 0, 0),
                utc(2016, 1, 1, 0, 0, 5),
            ])
            .build()
            .unwrap_err();
        assert!(matches!(err, BinnedSeriesError::SizeNotDuration { .. }));
    }

    #[test]
    fn bins_ending_past_the_representable_range_fail_at_build() {
        // Sum overflows i64 microseconds outright.
        let err = BinnedTimeSeriesBuilder::new()
            .time_bin_start(vec![DateTime::<Utc>::MAX_UTC])
            .time_bin_size(vec![Duration::microseconds(i64::MAX / 2)])
            .build()
            .unwrap_err();
        assert!(matches!(err, BinnedSeriesError::DurationOverflow));

        // Sum fits i64 but lands outside the representable instant range.
        let err = BinnedTimeSeriesBuilder::new()
            .time_bin_start(vec![DateTime::<Utc>::MAX_UTC])
            .time_bin_size(vec![Duration::microseconds(1)])
            .build()
            .unwrap_err();
        assert!(matches!(err, BinnedSeriesError::DurationOverflow));
    }

    #[test]
    fn bins_ending_exactly_at_the_range_boundary_are_fine() {
        let t_max =
            DateTime::from_timestamp_micros(DateTime::<Utc>::MAX_UTC.timestamp_micros()).unwrap();
        let series = BinnedTimeSeriesBuilder::new()
            .time_bin_start(vec![t_max - Duration::seconds(1)])
            .time_bin_size(vec![Duration::seconds(1)])
            .build()
            .unwrap();
        assert_eq!(series.time_bin_end(), vec![t_max]);
        assert_eq!(
            series.time_bin_center(),
            vec![t_max - Duration::milliseconds(500)]
        );
    }

    #[test]
    fn zero_bins_materialize_as_an_empty_series() {
        let series = BinnedTimeSeriesBuilder::new()
            .time_bin_start(Vec::<DateTime<Utc>>::new())
            .time_bin_end(utc(2016, 1, 1, 0, 0, 0))
            .build()
            .unwrap();
        assert!(series.is_empty());
        assert!(series.time_bin_start().is_empty());
    }
}
