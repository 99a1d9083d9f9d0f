//! Plain (non-binned) table views.
//!
//! Selecting a column subset that no longer contains both canonical bin
//! columns cannot support bin-derived computations, so it degrades to this
//! ordinary view: the projected batch plus the source's grouping metadata,
//! copied verbatim.

use arrow::array::RecordBatch;

use crate::table::groups::TableGroups;

/// An ordinary table view: projected columns plus carried-over grouping.
#[derive(Debug, Clone)]
pub struct TableView {
    batch: RecordBatch,
    groups: TableGroups,
}

impl TableView {
    pub(crate) fn new(batch: RecordBatch, groups: TableGroups) -> Self {
        TableView { batch, groups }
    }

    /// The underlying column data.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Grouping metadata copied from the view's source.
    pub fn groups(&self) -> &TableGroups {
        &self.groups
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    /// Whether the view has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names, in view order.
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }
}
