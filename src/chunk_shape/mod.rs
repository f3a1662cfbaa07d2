//! Balanced chunk shapes: choose per-dimension block sizes whose product fits
//! an element budget without concentrating the budget on one axis.
//!
//! The work is split between two layers:
//! 1. [`solve`] sizes a set of independent axis ranges in one pass.
//! 2. [`compute_chunk_shape`] applies a [`PreferencePlan`] by solving each
//!    priority group in turn, locking its result, and finishing with the axes
//!    no group names.

mod arith;
mod axis_range;
mod orchestrator;
mod preference;
mod solver;
mod types;

pub use axis_range::AxisRange;
pub use orchestrator::compute_chunk_shape;
pub use preference::{NamedPreferencePlan, PreferenceGroup, PreferencePlan};
pub use solver::solve;
pub use types::{ChunkShape, SolveStage};

pub(crate) use types::Extents;

#[cfg(feature = "bench")]
pub use solver::{refine_candidate, sweep_common_candidate};
