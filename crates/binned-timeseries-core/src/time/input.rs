//! Scalar-or-vector time and duration inputs, plus the small duration
//! algebra the bin normalizer needs.
//!
//! A caller may describe bins with a single starting instant or a per-row
//! vector of instants, and with a single bin width or a per-row vector of
//! widths. [`TimeInput`] and [`DurationInput`] capture that distinction so
//! the builder can branch on it explicitly instead of sniffing array shapes.
//!
//! The helpers here are deliberately tiny:
//!
//! - [`cumulative_sum`] turns a width vector into end offsets from an origin.
//! - [`shift_right_with_zero`] turns those end offsets into start offsets
//!   (bin 0 starts at the origin; bin i starts where bin i-1 ends).
//!
//! All arithmetic is checked; overflow reports as `None` rather than
//! panicking, and the caller maps it to its own error type.

use chrono::{DateTime, Duration, Utc};

/// A time input that is either one instant or a per-row vector of instants.
///
/// Scalar form selects uniform-origin bin construction (one origin, bins laid
/// out contiguously from it); vector form selects explicit-start construction
/// (one start per row, in caller order, not required to be sorted).
#[derive(Debug, Clone, PartialEq)]
pub enum TimeInput {
    /// A single instant.
    Scalar(DateTime<Utc>),
    /// One instant per row.
    Vector(Vec<DateTime<Utc>>),
}

impl TimeInput {
    /// Whether this input is the scalar form.
    pub fn is_scalar(&self) -> bool {
        matches!(self, TimeInput::Scalar(_))
    }
}

impl From<DateTime<Utc>> for TimeInput {
    fn from(value: DateTime<Utc>) -> Self {
        TimeInput::Scalar(value)
    }
}

impl From<Vec<DateTime<Utc>>> for TimeInput {
    fn from(value: Vec<DateTime<Utc>>) -> Self {
        TimeInput::Vector(value)
    }
}

/// A duration input that is either one width or a per-row vector of widths.
///
/// Durations are signed; negative widths are accepted and flow through
/// construction unchanged (matching the documented no-validation policy for
/// malformed bins).
#[derive(Debug, Clone, PartialEq)]
pub enum DurationInput {
    /// A single width, broadcast over all bins.
    Scalar(Duration),
    /// One width per bin.
    Vector(Vec<Duration>),
}

impl DurationInput {
    /// Whether this input is the scalar form.
    pub fn is_scalar(&self) -> bool {
        matches!(self, DurationInput::Scalar(_))
    }
}

impl From<Duration> for DurationInput {
    fn from(value: Duration) -> Self {
        DurationInput::Scalar(value)
    }
}

impl From<Vec<Duration>> for DurationInput {
    fn from(value: Vec<Duration>) -> Self {
        DurationInput::Vector(value)
    }
}

/// Running sum of `sizes`: `out[i] = sizes[0] + ... + sizes[i]`.
///
/// Returns `None` if any partial sum overflows the duration range.
pub fn cumulative_sum(sizes: &[Duration]) -> Option<Vec<Duration>> {
    let mut out = Vec::with_capacity(sizes.len());
    let mut running = Duration::zero();
    for size in sizes {
        running = running.checked_add(size)?;
        out.push(running);
    }
    Some(out)
}

/// Shift `offsets` one slot to the right, filling the first slot with zero.
///
/// Applied to the output of [`cumulative_sum`], this converts per-bin end
/// offsets into per-bin start offsets: bin 0 starts at the origin, and each
/// later bin starts where the previous one ends.
pub fn shift_right_with_zero(offsets: &[Duration]) -> Vec<Duration> {
    let mut out = Vec::with_capacity(offsets.len());
    if offsets.is_empty() {
        return out;
    }
    out.push(Duration::zero());
    out.extend_from_slice(&offsets[..offsets.len() - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumulative_sum_accumulates() {
        let sizes = [
            Duration::seconds(10),
            Duration::seconds(20),
            Duration::seconds(30),
        ];
        let sums = cumulative_sum(&sizes).unwrap();
        assert_eq!(
            sums,
            vec![
                Duration::seconds(10),
                Duration::seconds(30),
                Duration::seconds(60),
            ]
        );
    }

    #[test]
    fn cumulative_sum_accepts_negative_widths() {
        let sizes = [Duration::seconds(10), Duration::seconds(-4)];
        let sums = cumulative_sum(&sizes).unwrap();
        assert_eq!(sums, vec![Duration::seconds(10), Duration::seconds(6)]);
    }

    #[test]
    fn cumulative_sum_reports_overflow() {
        let sizes = [Duration::MAX, Duration::seconds(1)];
        assert!(cumulative_sum(&sizes).is_none());
    }

    #[test]
    fn shift_right_pins_first_offset_to_zero() {
        let offsets = [
            Duration::seconds(10),
            Duration::seconds(30),
            Duration::seconds(60),
        ];
        let shifted = shift_right_with_zero(&offsets);
        assert_eq!(
            shifted,
            vec![
                Duration::zero(),
                Duration::seconds(10),
                Duration::seconds(30),
            ]
        );
    }

    #[test]
    fn shift_right_of_empty_is_empty() {
        assert!(shift_right_with_zero(&[]).is_empty());
    }
}
