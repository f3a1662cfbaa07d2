use smallvec::SmallVec;
use snafu::prelude::*;
use tracing::debug;

use super::axis_range::AxisRange;
use super::preference::PreferencePlan;
use super::solver::solve_stage;
use super::types::{ChunkShape, SolveStage};
use crate::errors::chunk::{ChunkError, DegenerateShapeSnafu, InvalidBudgetSnafu};

type WorkingRanges = SmallVec<[AxisRange; 4]>;

/// Compute a balanced chunk shape for an array of `shape` holding at most
/// `budget` elements per chunk.
///
/// Each group of `plan` is solved in order with the full budget while every
/// axis outside the group is held at its lower bound; the group's sizes are
/// then locked. A last solve spreads what is left over the axes no group
/// names.
///
/// ```
/// use _core::{compute_chunk_shape, PreferencePlan};
///
/// let chunk = compute_chunk_shape(&[400, 30, 200, 100], 1024, &PreferencePlan::none())?;
/// assert_eq!(chunk.as_slice(), &[6, 6, 5, 5]);
///
/// let chunk = compute_chunk_shape(&[400, 30, 200, 100], 1024, &PreferencePlan::none().then([0, 1]))?;
/// assert_eq!(chunk.as_slice(), &[34, 30, 1, 1]);
/// # Ok::<(), _core::ChunkError>(())
/// ```
pub fn compute_chunk_shape(
    shape: &[u64],
    budget: u64,
    plan: &PreferencePlan,
) -> Result<ChunkShape, ChunkError> {
    for (axis, &extent) in shape.iter().enumerate() {
        ensure!(extent >= 1, DegenerateShapeSnafu { axis });
    }
    ensure!(budget >= 1, InvalidBudgetSnafu);
    plan.validate(shape.len())?;

    let mut working: WorkingRanges = shape.iter().map(|&extent| AxisRange::free(extent)).collect();
    lock_groups(&mut working, budget, plan)?;

    let chunk = solve_stage(&working, budget, SolveStage::Remainder)?;
    debug!(
        axes = ?plan.unmentioned_axes(shape.len()),
        chunk = ?chunk,
        "solved remaining axes"
    );
    Ok(ChunkShape::new(chunk))
}

/// Solve each preference group in turn and pin its axes to the result.
pub(crate) fn lock_groups(
    working: &mut [AxisRange],
    budget: u64,
    plan: &PreferencePlan,
) -> Result<(), ChunkError> {
    for (index, group) in plan.groups().iter().enumerate() {
        let trial: WorkingRanges = working
            .iter()
            .enumerate()
            .map(|(axis, range)| {
                if group.contains(axis) {
                    *range
                } else {
                    range.pinned_at_lower()
                }
            })
            .collect();

        let solved = solve_stage(&trial, budget, SolveStage::Group(index))?;
        for &axis in group.axes() {
            working[axis] = AxisRange::Pinned(solved[axis]);
        }
        debug!(
            group = index,
            axes = ?group.axes(),
            chunk = ?solved,
            "locked preference group"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(shape: &[u64], budget: u64, plan: PreferencePlan) -> Vec<u64> {
        compute_chunk_shape(shape, budget, &plan).unwrap().to_vec()
    }

    #[test]
    fn no_plan_is_balanced() {
        assert_eq!(chunk(&[400, 30, 200, 100], 1024, PreferencePlan::none()), vec![6, 6, 5, 5]);
    }

    #[test]
    fn single_axis_first() {
        let shape = [400, 30, 200, 100];
        assert_eq!(chunk(&shape, 1024, PreferencePlan::none().then(0)), vec![400, 2, 1, 1]);
        assert_eq!(
            chunk(&shape, 1024, PreferencePlan::none().then(0).then(1)),
            vec![400, 2, 1, 1]
        );
    }

    #[test]
    fn equal_priority_group() {
        assert_eq!(
            chunk(&[400, 30, 200, 100], 1024, PreferencePlan::none().then([0, 1])),
            vec![34, 30, 1, 1]
        );
    }

    #[test]
    fn groups_in_order() {
        let shape = [400, 30, 20, 10];
        assert_eq!(
            chunk(&shape, 1024, PreferencePlan::none().then([2, 3]).then(1).then(0)),
            vec![1, 5, 20, 10]
        );
        assert_eq!(
            chunk(&shape, 1024, PreferencePlan::none().then([2, 3]).then([1, 0])),
            vec![2, 2, 20, 10]
        );
    }

    #[test]
    fn budget_of_one_gives_all_ones() {
        assert_eq!(chunk(&[5, 5, 5], 1, PreferencePlan::none()), vec![1, 1, 1]);
        assert_eq!(chunk(&[5, 5, 5], 1, PreferencePlan::none().then(2)), vec![1, 1, 1]);
    }

    #[test]
    fn unit_shape() {
        for budget in [1, 2, 1000] {
            assert_eq!(chunk(&[1], budget, PreferencePlan::none()), vec![1]);
        }
    }

    #[test]
    fn rejects_degenerate_shape() {
        assert_eq!(
            compute_chunk_shape(&[4, 0, 3], 10, &PreferencePlan::none()),
            Err(ChunkError::DegenerateShape { axis: 1 })
        );
    }

    #[test]
    fn rejects_zero_budget() {
        assert_eq!(
            compute_chunk_shape(&[4, 3], 0, &PreferencePlan::none()),
            Err(ChunkError::InvalidBudget)
        );
    }

    #[test]
    fn rejects_overlapping_groups() {
        let plan = PreferencePlan::none().then([0, 1]).then(1);
        assert_eq!(
            compute_chunk_shape(&[4, 3], 10, &plan),
            Err(ChunkError::OverlappingPreference {
                axis: 1,
                first_group: 0,
                second_group: 1
            })
        );
    }

    #[test]
    fn infeasible_group_is_named() {
        // Axis 0 already locked at 5 leaves no room in a budget of 2.
        let mut working = [AxisRange::Pinned(5), AxisRange::free(5)];
        let err = lock_groups(&mut working, 2, &PreferencePlan::none().then(1)).unwrap_err();
        assert_eq!(
            err,
            ChunkError::InfeasibleBudget {
                min_product: 5,
                budget: 2,
                stage: SolveStage::Group(0),
            }
        );
        assert_eq!(working[1], AxisRange::free(5));
    }

    #[test]
    fn locked_groups_are_pinned() {
        let mut working = [AxisRange::free(400), AxisRange::free(30), AxisRange::free(200)];
        lock_groups(&mut working, 1024, &PreferencePlan::none().then(1)).unwrap();
        assert_eq!(
            working,
            [AxisRange::free(400), AxisRange::Pinned(30), AxisRange::free(200)]
        );
    }

    #[test]
    fn scalar_array_has_empty_chunk() {
        let out = compute_chunk_shape(&[], 8, &PreferencePlan::none()).unwrap();
        assert!(out.is_empty());
    }
}
