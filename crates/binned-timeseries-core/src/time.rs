//! Time and duration inputs for bin construction.
//!
//! This module groups the scalar-or-vector input forms accepted by the
//! series builder (`input`) and the conversion of raw file columns into
//! concrete UTC instants and durations (`format`).

pub mod format;
pub mod input;

pub use format::{SizeUnit, TimeColumnError, TimeFormat, TimeScale};
pub use input::{DurationInput, TimeInput};
