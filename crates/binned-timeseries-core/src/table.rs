//! Thin helpers over the underlying Arrow table.
//!
//! The binned series stores its rows in a plain [`arrow::array::RecordBatch`];
//! this module supplies the few column-container operations the core needs
//! (remove-by-name, rebuild-with-leading-columns), the grouping metadata that
//! rides along on derived views, and the plain [`view::TableView`] a column
//! selection degrades to when it no longer carries both canonical bin columns.

pub mod columns;
pub mod groups;
pub mod view;

pub use groups::TableGroups;
pub use view::TableView;
