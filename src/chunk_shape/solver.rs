//! Axis-group solver: one block size per range, product under a budget,
//! balanced across the free ranges.
//!
//! The search runs in two phases:
//! 1. Common-candidate sweep: clamp a shared size `k` into every range and keep
//!    the largest `k` whose clamped product fits the budget.
//! 2. Local refinement: try every "+0 or +1 per dimension" variant of that tuple
//!    and keep the admissible one with the largest product.

use smallvec::SmallVec;
use snafu::prelude::*;
use tracing::trace;

use super::arith::{bounded_product, checked_product};
use super::axis_range::AxisRange;
use super::types::{Extents, SolveStage};
use crate::errors::chunk::{
    ChunkError, InfeasibleBudgetSnafu, ProductOverflowSnafu, TooManyDimensionsSnafu,
};
use crate::limits;

/// Pick one size per range so the product is at most `budget` and the sizes
/// are as close to equal as the ranges allow.
///
/// Fails with [`ChunkError::InfeasibleBudget`] when the product of the lower
/// bounds already exceeds `budget`.
pub fn solve(ranges: &[AxisRange], budget: u64) -> Result<Extents, ChunkError> {
    solve_stage(ranges, budget, SolveStage::Direct)
}

pub(crate) fn solve_stage(
    ranges: &[AxisRange],
    budget: u64,
    stage: SolveStage,
) -> Result<Extents, ChunkError> {
    for (axis, range) in ranges.iter().enumerate() {
        range.validate(axis)?;
    }

    let min_product =
        checked_product(ranges.iter().map(AxisRange::lo)).context(ProductOverflowSnafu { stage })?;
    ensure!(
        min_product <= budget,
        InfeasibleBudgetSnafu {
            min_product,
            budget,
            stage,
        }
    );

    let k = sweep_common_candidate(ranges, budget);
    let base = clamp_all(ranges, k);

    let movable = movable_axes(ranges, &base);
    let max = limits::max_refine_dims();
    ensure!(
        movable.len() <= max,
        TooManyDimensionsSnafu {
            ndim: movable.len(),
            max,
        }
    );

    let refined = refine_over(ranges, &base, &movable, budget);
    trace!(%stage, k, ?base, ?refined, budget, "solved axis group");
    Ok(refined)
}

/// Largest shared size `k` whose clamped product fits `budget`.
///
/// The clamped product never decreases as `k` grows, so admissibility is a
/// prefix of `[1, max hi]` and the largest admissible `k` is found by bisection.
///
/// Assumes the product of lower bounds fits `budget`, which makes `k = 1`
/// admissible.
pub fn sweep_common_candidate(ranges: &[AxisRange], budget: u64) -> u64 {
    let fits = |k: u64| bounded_product(ranges.iter().map(|r| r.clamp(k)), budget).is_some();

    let mut lo = 1u64;
    let mut hi = ranges.iter().map(AxisRange::hi).max().unwrap_or(1);
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// Best admissible "+0 or +1 per dimension" variant of `base`.
///
/// Ties on product go to fewer effective increments, then to the variant that
/// increments the left-most dimensions. Falls back to `base` when no variant
/// fits, which only happens if `base` itself is over budget.
pub fn refine_candidate(ranges: &[AxisRange], base: &[u64], budget: u64) -> Extents {
    refine_over(ranges, base, &movable_axes(ranges, base), budget)
}

/// Axes whose "+1" survives clamping. Pinned axes and axes already at their
/// upper bound only repeat variants, so refinement skips them.
fn movable_axes(ranges: &[AxisRange], base: &[u64]) -> SmallVec<[usize; 4]> {
    ranges
        .iter()
        .zip(base)
        .enumerate()
        .filter(|(_, (range, &b))| range.clamp(b.saturating_add(1)) != b)
        .map(|(axis, _)| axis)
        .collect()
}

fn refine_over(ranges: &[AxisRange], base: &[u64], movable: &[usize], budget: u64) -> Extents {
    let n = movable.len();
    let mut best: Option<(u64, u32, Extents)> = None;

    // The first movable axis is the most significant bit, so masks run 11..1, 11..0, ..., 00..0.
    for mask in (0..1u64 << n).rev() {
        let mut candidate = Extents::from_slice(base);
        for (bit, &axis) in movable.iter().enumerate() {
            if (mask >> (n - 1 - bit)) & 1 == 1 {
                candidate[axis] = ranges[axis].clamp(base[axis].saturating_add(1));
            }
        }

        let Some(product) = bounded_product(candidate.iter().copied(), budget) else {
            continue;
        };
        let increments = mask.count_ones();

        let better = match &best {
            None => true,
            Some((best_product, best_increments, _)) => {
                product > *best_product
                    || (product == *best_product && increments < *best_increments)
            }
        };
        if better {
            best = Some((product, increments, candidate));
        }
    }

    best.map(|(_, _, candidate)| candidate)
        .unwrap_or_else(|| Extents::from_slice(base))
}

fn clamp_all(ranges: &[AxisRange], k: u64) -> Extents {
    ranges.iter().map(|r| r.clamp(k)).collect()
}
