//! Grouping metadata carried by binned series and plain views.
//!
//! A grouping is an index partition over the rows plus optional key columns:
//! group `g` spans rows `indices[g] .. indices[g + 1]`, and `keys` (when
//! present) holds one row of key values per group. This core never computes
//! groupings itself; it only stores them and copies them verbatim onto
//! derived views, so selections that degrade to a plain table keep whatever
//! grouping their source had.

use arrow::array::RecordBatch;

/// An index partition plus optional key columns describing row groups.
#[derive(Debug, Clone)]
pub struct TableGroups {
    indices: Vec<usize>,
    keys: Option<RecordBatch>,
}

impl TableGroups {
    /// Grouping with a single group spanning all `n_rows` rows.
    pub fn trivial(n_rows: usize) -> Self {
        TableGroups {
            indices: vec![0, n_rows],
            keys: None,
        }
    }

    /// Grouping from an explicit boundary partition and key columns.
    ///
    /// `indices` is expected to be non-decreasing, starting at 0 and ending
    /// at the row count, with one entry per group boundary; `keys` carries
    /// one row per group. Neither is validated beyond a debug assertion --
    /// this metadata is opaque to the core.
    pub fn new(indices: Vec<usize>, keys: Option<RecordBatch>) -> Self {
        debug_assert!(
            indices.windows(2).all(|w| w[0] <= w[1]),
            "group boundaries must be non-decreasing"
        );
        TableGroups { indices, keys }
    }

    /// The group boundary partition.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The per-group key columns, if any.
    pub fn keys(&self) -> Option<&RecordBatch> {
        self.keys.as_ref()
    }

    /// Number of groups in the partition.
    pub fn len(&self) -> usize {
        self.indices.len().saturating_sub(1)
    }

    /// Whether the partition contains no groups.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
