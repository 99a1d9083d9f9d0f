//! The binned series type and its derived views.
//!
//! A [`BinnedTimeSeries`] owns an Arrow batch whose first two columns are the
//! canonical bin boundaries; everything else about the bins (`end`, `center`)
//! is recomputed from those two columns on every access. Construction goes
//! through [`crate::series::builder::BinnedTimeSeriesBuilder`] (or
//! [`crate::io::read`]); after that the series is read-only.

use arrow::array::{DurationMicrosecondArray, RecordBatch, TimestampMicrosecondArray};
use chrono::{DateTime, Duration, Utc};
use snafu::prelude::*;

use crate::series::builder::BinnedTimeSeriesBuilder;
use crate::series::error::{ArrowSnafu, BinnedSeriesError, ColumnNotFoundSnafu};
use crate::table::groups::TableGroups;
use crate::table::view::TableView;

/// Name of the canonical bin-start column.
pub const TIME_BIN_START: &str = "time_bin_start";

/// Name of the canonical bin-size column.
pub const TIME_BIN_SIZE: &str = "time_bin_size";

/// Field-metadata key marking the bin-start column as a lookup index.
///
/// Set on materialization and preserved through selections; this crate only
/// writes the flag, index machinery is a collaborator concern.
pub const LOOKUP_INDEX_KEY: &str = "binned_timeseries.lookup_index";

/// A table of measurements aggregated into per-row time bins.
///
/// Bin `i` covers the half-open interval
/// `[time_bin_start[i], time_bin_start[i] + time_bin_size[i])`. Bins are not
/// required to be sorted, contiguous, or non-overlapping, and sizes may be
/// negative; only length consistency is guaranteed.
#[derive(Debug, Clone)]
pub struct BinnedTimeSeries {
    batch: RecordBatch,
    groups: TableGroups,
}

/// Result of selecting a column subset from a binned series.
#[derive(Debug, Clone)]
pub enum Selection {
    /// The subset kept both canonical bin columns, so bin-derived views are
    /// still supported.
    Binned(BinnedTimeSeries),
    /// The subset dropped at least one canonical column and degraded to an
    /// ordinary table view carrying the source's grouping metadata.
    Plain(TableView),
}

impl BinnedTimeSeries {
    /// Start building a series.
    pub fn builder() -> BinnedTimeSeriesBuilder {
        BinnedTimeSeriesBuilder::new()
    }

    pub(crate) fn from_parts(batch: RecordBatch, groups: TableGroups) -> Self {
        BinnedTimeSeries { batch, groups }
    }

    /// The underlying column data, canonical columns at positions 0 and 1.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Number of bins (= rows).
    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    /// Whether the series has no bins.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names, in storage order.
    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    /// Grouping metadata attached to this series.
    pub fn groups(&self) -> &TableGroups {
        &self.groups
    }

    /// Replace the grouping metadata.
    pub fn with_groups(mut self, groups: TableGroups) -> Self {
        self.groups = groups;
        self
    }

    fn start_micros(&self) -> &TimestampMicrosecondArray {
        let index = self
            .batch
            .schema_ref()
            .index_of(TIME_BIN_START)
            .expect("a binned series always carries its start column");
        self.batch
            .column(index)
            .as_any()
            .downcast_ref()
            .expect("the start column is always Timestamp(Microsecond)")
    }

    fn size_micros(&self) -> &DurationMicrosecondArray {
        let index = self
            .batch
            .schema_ref()
            .index_of(TIME_BIN_SIZE)
            .expect("a binned series always carries its size column");
        self.batch
            .column(index)
            .as_any()
            .downcast_ref()
            .expect("the size column is always Duration(Microsecond)")
    }

    fn instant(micros: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_micros(micros)
            .expect("materialized bin times round-trip through the timestamp range")
    }

    /// The start times of all the time bins.
    pub fn time_bin_start(&self) -> Vec<DateTime<Utc>> {
        self.start_micros()
            .values()
            .iter()
            .map(|micros| Self::instant(*micros))
            .collect()
    }

    /// The sizes of all the time bins.
    pub fn time_bin_size(&self) -> Vec<Duration> {
        self.size_micros()
            .values()
            .iter()
            .map(|micros| Duration::microseconds(*micros))
            .collect()
    }

    /// The end times of all the time bins: `start + size`.
    pub fn time_bin_end(&self) -> Vec<DateTime<Utc>> {
        self.start_micros()
            .values()
            .iter()
            .zip(self.size_micros().values())
            .map(|(start, size)| Self::instant(start + size))
            .collect()
    }

    /// The center times of all the time bins: `start + size / 2`.
    ///
    /// Centers are computed at microsecond precision; an odd microsecond
    /// count truncates toward the start.
    pub fn time_bin_center(&self) -> Vec<DateTime<Utc>> {
        self.start_micros()
            .values()
            .iter()
            .zip(self.size_micros().values())
            .map(|(start, size)| Self::instant(start + size / 2))
            .collect()
    }

    /// Select a subset of named columns.
    ///
    /// If the subset includes **both** canonical bin columns, the result is
    /// still a binned series (canonical columns re-pinned to positions 0 and
    /// 1, remaining columns in request order). Otherwise the selection can no
    /// longer support bin-derived views and degrades to a plain
    /// [`TableView`], with this series' grouping metadata copied onto it
    /// verbatim.
    pub fn select(&self, names: &[&str]) -> Result<Selection, BinnedSeriesError> {
        let schema = self.batch.schema_ref();
        for name in names {
            ensure!(
                schema.column_with_name(name).is_some(),
                ColumnNotFoundSnafu { column: *name }
            );
        }

        let has_both = names.contains(&TIME_BIN_START) && names.contains(&TIME_BIN_SIZE);
        if has_both {
            let mut ordered: Vec<&str> = vec![TIME_BIN_START, TIME_BIN_SIZE];
            ordered.extend(
                names
                    .iter()
                    .filter(|n| **n != TIME_BIN_START && **n != TIME_BIN_SIZE)
                    .copied(),
            );
            let batch = self.project(&ordered)?;
            Ok(Selection::Binned(BinnedTimeSeries {
                batch,
                groups: self.groups.clone(),
            }))
        } else {
            let batch = self.project(names)?;
            Ok(Selection::Plain(TableView::new(
                batch,
                self.groups.clone(),
            )))
        }
    }

    fn project(&self, names: &[&str]) -> Result<RecordBatch, BinnedSeriesError> {
        let schema = self.batch.schema_ref();
        let indices: Vec<usize> = names
            .iter()
            .map(|name| {
                schema
                    .column_with_name(name)
                    .map(|(index, _)| index)
                    .context(ColumnNotFoundSnafu { column: *name })
            })
            .collect::<Result<_, _>>()?;
        self.batch.project(&indices).context(ArrowSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn sample_series() -> BinnedTimeSeries {
        let schema = Arc::new(Schema::new(vec![
            Field::new("flux", DataType::Float64, false),
            Field::new("quality", DataType::Int64, false),
        ]));
        let data = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(vec![1.0, 4.0, 3.0])),
                Arc::new(Int64Array::from(vec![0, 0, 1])),
            ],
        )
        .unwrap();

        BinnedTimeSeries::builder()
            .data(data)
            .time_bin_start(Utc.with_ymd_and_hms(2016, 3, 22, 12, 30, 31).unwrap())
            .time_bin_size(Duration::seconds(3))
            .build()
            .unwrap()
    }

    #[test]
    fn canonical_columns_sit_at_the_front() {
        let series = sample_series();
        assert_eq!(
            series.column_names(),
            vec![TIME_BIN_START, TIME_BIN_SIZE, "flux", "quality"]
        );
        let start_field = series.batch().schema_ref().field(0).clone();
        assert_eq!(start_field.metadata().get(LOOKUP_INDEX_KEY).map(String::as_str), Some("true"));
    }

    #[test]
    fn center_splits_the_bin() {
        let series = sample_series();
        let starts = series.time_bin_start();
        let centers = series.time_bin_center();
        for (start, center) in starts.iter().zip(&centers) {
            assert_eq!(*center, *start + Duration::milliseconds(1_500));
        }
    }

    #[test]
    fn center_truncates_toward_the_start_for_odd_and_negative_sizes() {
        let t0 = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap();
        let t1 = t0 + Duration::seconds(10);
        let series = BinnedTimeSeries::builder()
            .time_bin_start(vec![t0, t1])
            .time_bin_size(vec![Duration::microseconds(5), Duration::microseconds(-5)])
            .build()
            .unwrap();

        // Odd sizes have no exact midpoint; the half-width offset shrinks
        // toward zero, so the center lands on the start side of the true
        // midpoint for positive and negative sizes alike.
        assert_eq!(
            series.time_bin_center(),
            vec![t0 + Duration::microseconds(2), t1 - Duration::microseconds(2)]
        );
    }

    #[test]
    fn derived_views_are_idempotent() {
        let series = sample_series();
        assert_eq!(series.time_bin_end(), series.time_bin_end());
        assert_eq!(series.time_bin_center(), series.time_bin_center());
    }

    #[test]
    fn selection_without_bin_columns_degrades_to_plain() {
        let series = sample_series();
        let groups = TableGroups::new(vec![0, 2, 3], None);
        let series = series.with_groups(groups);

        match series.select(&["flux"]).unwrap() {
            Selection::Plain(view) => {
                assert_eq!(view.column_names(), vec!["flux"]);
                // Grouping metadata travels verbatim onto the plain view.
                assert_eq!(view.groups().indices(), &[0, 2, 3]);
            }
            Selection::Binned(_) => panic!("expected a plain view"),
        }
    }

    #[test]
    fn selection_with_both_bin_columns_stays_binned() {
        let series = sample_series();
        match series
            .select(&["flux", TIME_BIN_START, TIME_BIN_SIZE])
            .unwrap()
        {
            Selection::Binned(binned) => {
                assert_eq!(
                    binned.column_names(),
                    vec![TIME_BIN_START, TIME_BIN_SIZE, "flux"]
                );
                assert_eq!(binned.time_bin_end(), series.time_bin_end());
            }
            Selection::Plain(_) => panic!("expected a binned selection"),
        }
    }

    #[test]
    fn selection_with_one_bin_column_degrades_too() {
        let series = sample_series();
        assert!(matches!(
            series.select(&[TIME_BIN_START, "flux"]).unwrap(),
            Selection::Plain(_)
        ));
    }

    #[test]
    fn selecting_an_unknown_column_fails() {
        let series = sample_series();
        let err = series.select(&["nope"]).unwrap_err();
        assert!(matches!(err, BinnedSeriesError::ColumnNotFound { .. }));
    }
}
