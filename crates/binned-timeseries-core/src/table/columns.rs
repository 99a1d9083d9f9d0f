//! Column-container operations over `RecordBatch`.
//!
//! Arrow batches are immutable, so "remove" and "insert" are expressed as
//! rebuilds. Row counts are always threaded through explicitly
//! (`RecordBatchOptions::with_row_count`) so a batch that loses its last
//! column still remembers how many rows it has.

use arrow::array::{ArrayRef, RecordBatch, RecordBatchOptions};
use arrow::datatypes::{FieldRef, Schema};
use arrow::error::ArrowError;
use std::sync::Arc;

/// A column removed from a batch, together with the batch that remains.
#[derive(Debug, Clone)]
pub struct TakenColumn {
    /// The removed column's field (name, type, metadata).
    pub field: FieldRef,
    /// The removed column's values.
    pub values: ArrayRef,
    /// The source batch minus the removed column, row count preserved.
    pub rest: RecordBatch,
}

/// Remove the column named `name` from `batch`, if present.
///
/// Returns `Ok(None)` when the batch has no such column.
pub fn take_column(batch: &RecordBatch, name: &str) -> Result<Option<TakenColumn>, ArrowError> {
    let schema = batch.schema();
    let Some((index, _)) = schema.column_with_name(name) else {
        return Ok(None);
    };

    let field = schema.fields()[index].clone();
    let values = batch.column(index).clone();

    let rest_fields: Vec<FieldRef> = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, f)| f.clone())
        .collect();
    let rest_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, c)| c.clone())
        .collect();

    let rest = RecordBatch::try_new_with_options(
        Arc::new(Schema::new(rest_fields)),
        rest_columns,
        &RecordBatchOptions::new().with_row_count(Some(batch.num_rows())),
    )?;

    Ok(Some(TakenColumn {
        field,
        values,
        rest,
    }))
}

/// Build a batch whose first columns are `leading`, followed by the columns
/// of `data` (if any), with `row_count` rows.
///
/// This is the single materialization point for the canonical bin columns:
/// they land at fixed positions 0 and 1, ahead of whatever the caller
/// supplied.
pub fn with_leading_columns(
    data: Option<&RecordBatch>,
    leading: Vec<(FieldRef, ArrayRef)>,
    row_count: usize,
) -> Result<RecordBatch, ArrowError> {
    let mut fields: Vec<FieldRef> = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();
    for (field, values) in leading {
        fields.push(field);
        arrays.push(values);
    }
    if let Some(batch) = data {
        fields.extend(batch.schema().fields().iter().cloned());
        arrays.extend(batch.columns().iter().cloned());
    }

    RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        arrays,
        &RecordBatchOptions::new().with_row_count(Some(row_count)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Float64Array, Int64Array};
    use arrow::datatypes::{DataType, Field};

    fn two_column_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("a", DataType::Int64, false),
            Field::new("b", DataType::Float64, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(Float64Array::from(vec![0.1, 0.2, 0.3])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn take_column_removes_and_preserves_rest() {
        let batch = two_column_batch();
        let taken = take_column(&batch, "a").unwrap().unwrap();
        assert_eq!(taken.field.name(), "a");
        assert_eq!(taken.values.len(), 3);
        assert_eq!(taken.rest.num_columns(), 1);
        assert_eq!(taken.rest.num_rows(), 3);
        assert_eq!(taken.rest.schema().field(0).name(), "b");
    }

    #[test]
    fn take_column_of_absent_name_is_none() {
        let batch = two_column_batch();
        assert!(take_column(&batch, "missing").unwrap().is_none());
    }

    #[test]
    fn take_column_keeps_row_count_when_last_column_goes() {
        let batch = two_column_batch();
        let rest = take_column(&batch, "a").unwrap().unwrap().rest;
        let rest = take_column(&rest, "b").unwrap().unwrap().rest;
        assert_eq!(rest.num_columns(), 0);
        assert_eq!(rest.num_rows(), 3);
    }

    #[test]
    fn leading_columns_come_first() {
        let batch = two_column_batch();
        let lead_field: FieldRef = Arc::new(Field::new("lead", DataType::Int64, false));
        let lead_values: ArrayRef = Arc::new(Int64Array::from(vec![9, 8, 7]));
        let out = with_leading_columns(Some(&batch), vec![(lead_field, lead_values)], 3).unwrap();
        let names: Vec<&str> = out
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect();
        assert_eq!(names, vec!["lead", "a", "b"]);
    }

    #[test]
    fn leading_columns_without_data() {
        let lead_field: FieldRef = Arc::new(Field::new("lead", DataType::Int64, false));
        let lead_values: ArrayRef = Arc::new(Int64Array::from(vec![1, 2]));
        let out = with_leading_columns(None, vec![(lead_field, lead_values)], 2).unwrap();
        assert_eq!(out.num_columns(), 1);
        assert_eq!(out.num_rows(), 2);
    }
}
