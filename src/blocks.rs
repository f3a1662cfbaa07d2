//! Block intervals for bulk incremental loading: cover each dimension with
//! half-open index intervals of a fixed step and walk their combinations.

use std::ops::Range;

use snafu::prelude::*;

use crate::chunk_shape::ChunkShape;
use crate::errors::chunk::{ChunkError, DimensionMismatchSnafu, InvalidStepSnafu};

/// Half-open intervals covering `[0, extent)` in steps of `step`; the last one
/// is truncated to fit.
#[derive(Debug, Clone)]
pub struct BlockIntervals {
    next_start: u64,
    extent: u64,
    step: u64,
}

/// Split `[0, extent)` into intervals of `step` indices.
///
/// ```
/// let got: Vec<_> = _core::block_intervals(14, 4).unwrap().collect();
/// assert_eq!(got, vec![0..4, 4..8, 8..12, 12..14]);
/// ```
pub fn block_intervals(extent: u64, step: u64) -> Result<BlockIntervals, ChunkError> {
    ensure!(step > 0, InvalidStepSnafu { axis: 0usize });
    Ok(BlockIntervals {
        next_start: 0,
        extent,
        step,
    })
}

impl Iterator for BlockIntervals {
    type Item = Range<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_start >= self.extent {
            return None;
        }
        let start = self.next_start;
        let end = start.saturating_add(self.step).min(self.extent);
        self.next_start = end;
        Some(start..end)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.extent.saturating_sub(self.next_start).div_ceil(self.step);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// Every combination of per-dimension block intervals, last dimension fastest.
///
/// Intervals are computed on demand from the block indices; only one index
/// per dimension is held. A zero-dimensional shape yields one empty block.
#[derive(Debug, Clone)]
pub struct BlockIter {
    shape: Vec<u64>,
    steps: Vec<u64>,
    grid_shape: Vec<u64>,
    cur: Vec<u64>,
    started: bool,
    done: bool,
}

impl BlockIter {
    pub fn new(shape: &[u64], steps: &[u64]) -> Result<Self, ChunkError> {
        ensure!(
            shape.len() == steps.len(),
            DimensionMismatchSnafu {
                expected: shape.len(),
                got: steps.len(),
            }
        );
        for (axis, &step) in steps.iter().enumerate() {
            ensure!(step > 0, InvalidStepSnafu { axis });
        }
        let grid_shape: Vec<u64> = shape
            .iter()
            .zip(steps)
            .map(|(&extent, &step)| extent.div_ceil(step))
            .collect();

        Ok(Self {
            shape: shape.to_vec(),
            steps: steps.to_vec(),
            cur: vec![0; grid_shape.len()],
            done: grid_shape.contains(&0),
            grid_shape,
            started: false,
        })
    }

    /// Step through `shape` one chunk of `chunk` at a time.
    pub fn from_chunk_shape(shape: &[u64], chunk: &ChunkShape) -> Result<Self, ChunkError> {
        Self::new(shape, chunk.as_slice())
    }

    /// Total number of blocks, ignoring iteration progress. Saturates at
    /// `u64::MAX`.
    pub fn block_count(&self) -> u64 {
        self.grid_shape
            .iter()
            .fold(1u64, |acc, &n| acc.saturating_mul(n))
    }

    fn current(&self) -> Vec<Range<u64>> {
        self.cur
            .iter()
            .zip(self.steps.iter().zip(&self.shape))
            .map(|(&i, (&step, &extent))| {
                let start = i * step;
                start..start.saturating_add(step).min(extent)
            })
            .collect()
    }
}

impl Iterator for BlockIter {
    type Item = Vec<Range<u64>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current());
        }
        // advance lexicographically (last dim fastest)
        for i in (0..self.cur.len()).rev() {
            self.cur[i] += 1;
            if self.cur[i] < self.grid_shape[i] {
                return Some(self.current());
            }
            self.cur[i] = 0;
        }
        self.done = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_truncate_last() {
        let got: Vec<_> = block_intervals(14, 4).unwrap().collect();
        assert_eq!(got, vec![0..4, 4..8, 8..12, 12..14]);
    }

    #[test]
    fn intervals_exact_multiple() {
        let it = block_intervals(12, 4).unwrap();
        assert_eq!(it.size_hint(), (3, Some(3)));
        assert_eq!(it.last(), Some(8..12));
    }

    #[test]
    fn step_larger_than_extent() {
        let got: Vec<_> = block_intervals(3, 10).unwrap().collect();
        assert_eq!(got, vec![0..3]);
    }

    #[test]
    fn zero_extent_and_zero_step() {
        assert_eq!(block_intervals(0, 4).unwrap().count(), 0);
        assert_eq!(
            block_intervals(5, 0).unwrap_err(),
            ChunkError::InvalidStep { axis: 0 }
        );
    }

    #[test]
    fn blocks_last_dim_fastest() {
        let blocks: Vec<_> = BlockIter::new(&[3, 5], &[2, 3]).unwrap().collect();
        assert_eq!(
            blocks,
            vec![
                vec![0..2, 0..3],
                vec![0..2, 3..5],
                vec![2..3, 0..3],
                vec![2..3, 3..5],
            ]
        );
    }

    #[test]
    fn block_count_matches_iteration() {
        let it = BlockIter::new(&[14, 7, 3], &[4, 2, 3]).unwrap();
        assert_eq!(it.block_count(), 4 * 4);
        assert_eq!(it.count(), 16);
    }

    #[test]
    fn huge_axis_is_not_materialised() {
        let mut it = BlockIter::new(&[1_000_000_000_000, 6], &[1, 4]).unwrap();
        assert_eq!(it.block_count(), 2_000_000_000_000);
        assert_eq!(it.next(), Some(vec![0..1, 0..4]));
        assert_eq!(it.next(), Some(vec![0..1, 4..6]));
        assert_eq!(it.next(), Some(vec![1..2, 0..4]));
    }

    #[test]
    fn zero_extent_yields_nothing() {
        let it = BlockIter::new(&[4, 0], &[2, 2]).unwrap();
        assert_eq!(it.block_count(), 0);
        assert_eq!(it.count(), 0);
    }

    #[test]
    fn scalar_shape_has_one_block() {
        let blocks: Vec<_> = BlockIter::new(&[], &[]).unwrap().collect();
        assert_eq!(blocks, vec![Vec::<Range<u64>>::new()]);
    }

    #[test]
    fn step_errors_name_the_axis() {
        assert_eq!(
            BlockIter::new(&[4, 4], &[2, 0]).unwrap_err(),
            ChunkError::InvalidStep { axis: 1 }
        );
        assert_eq!(
            BlockIter::new(&[4, 4], &[2]).unwrap_err(),
            ChunkError::DimensionMismatch {
                expected: 2,
                got: 1
            }
        );
    }
}
