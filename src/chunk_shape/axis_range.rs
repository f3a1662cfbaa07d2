use std::fmt;

use snafu::prelude::*;

use crate::errors::chunk::{ChunkError, InvalidRangeSnafu};

/// Admissible block sizes for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisRange {
    /// Any size in the closed interval `[lo, hi]`.
    Free { lo: u64, hi: u64 },
    /// Size fixed to this value.
    Pinned(u64),
}

impl AxisRange {
    /// The full range `[1, extent]` of a dimension.
    pub fn free(extent: u64) -> Self {
        AxisRange::Free { lo: 1, hi: extent }
    }

    pub fn lo(&self) -> u64 {
        match *self {
            AxisRange::Free { lo, .. } => lo,
            AxisRange::Pinned(v) => v,
        }
    }

    pub fn hi(&self) -> u64 {
        match *self {
            AxisRange::Free { hi, .. } => hi,
            AxisRange::Pinned(v) => v,
        }
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, AxisRange::Pinned(_))
    }

    /// Clamp a candidate size into this range.
    pub fn clamp(&self, k: u64) -> u64 {
        k.max(self.lo()).min(self.hi())
    }

    /// This range fixed at its lower bound.
    pub(crate) fn pinned_at_lower(&self) -> Self {
        AxisRange::Pinned(self.lo())
    }

    pub(crate) fn validate(&self, axis: usize) -> Result<(), ChunkError> {
        let (lo, hi) = (self.lo(), self.hi());
        ensure!(lo >= 1 && lo <= hi, InvalidRangeSnafu { axis, lo, hi });
        Ok(())
    }
}

impl fmt::Display for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisRange::Free { lo, hi } => write!(f, "[{lo}, {hi}]"),
            AxisRange::Pinned(v) => write!(f, "={v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_free_range() {
        let r = AxisRange::Free { lo: 2, hi: 15 };
        assert_eq!(r.clamp(1), 2);
        assert_eq!(r.clamp(7), 7);
        assert_eq!(r.clamp(40), 15);
    }

    #[test]
    fn pinned_ignores_candidate() {
        let r = AxisRange::Pinned(400);
        assert_eq!(r.clamp(1), 400);
        assert_eq!(r.clamp(1000), 400);
        assert!(r.is_pinned());
    }

    #[test]
    fn pinning_keeps_lower_bound() {
        assert_eq!(AxisRange::free(30).pinned_at_lower(), AxisRange::Pinned(1));
        assert_eq!(AxisRange::Pinned(5).pinned_at_lower(), AxisRange::Pinned(5));
    }

    #[test]
    fn rejects_empty_and_zero_ranges() {
        assert_eq!(
            AxisRange::Free { lo: 4, hi: 3 }.validate(1),
            Err(ChunkError::InvalidRange { axis: 1, lo: 4, hi: 3 })
        );
        assert!(AxisRange::Pinned(0).validate(0).is_err());
        assert!(AxisRange::free(1).validate(0).is_ok());
    }
}
